//! Return document session.
//!
//! Owns the document behind a mutex and orchestrates the event-driven flows
//! around it: debounced candidate loading with a per-session reentrancy
//! guard, selected-candidate import with user feedback, the two-phase
//! quantity-change recompute, and fire-and-forget item-name refreshes that
//! tolerate the target line disappearing while the lookup is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::core::{
    compute, import, Computation, ImportOutcome, InvoiceCandidate, NameRefresh, RetoureError,
    ReturnAmounts, ReturnDocument,
};

use super::debounce::{Debouncer, DEFAULT_QUIET};
use super::traits::{CandidateQuery, CandidateSource, ItemRegistry, Notice, NotificationSink};

/// Single-user, single-document session over a [`ReturnDocument`].
pub struct ReturnSession {
    document: Arc<Mutex<ReturnDocument>>,
    source: Arc<dyn CandidateSource>,
    registry: Arc<dyn ItemRegistry>,
    notifier: Arc<dyn NotificationSink>,
    // Guards the candidate load against overlapping network calls.
    // Per-session state, not a module global.
    loading: AtomicBool,
    debouncer: Debouncer,
}

impl ReturnSession {
    pub fn new(
        document: ReturnDocument,
        source: Arc<dyn CandidateSource>,
        registry: Arc<dyn ItemRegistry>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Arc<Self> {
        Self::with_quiet_period(document, source, registry, notifier, DEFAULT_QUIET)
    }

    /// Like [`new`](Self::new) with an explicit debounce quiet period
    /// (tests use a short one).
    pub fn with_quiet_period(
        document: ReturnDocument,
        source: Arc<dyn CandidateSource>,
        registry: Arc<dyn ItemRegistry>,
        notifier: Arc<dyn NotificationSink>,
        quiet: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            document: Arc::new(Mutex::new(document)),
            source,
            registry,
            notifier,
            loading: AtomicBool::new(false),
            debouncer: Debouncer::new(quiet),
        })
    }

    fn doc(&self) -> MutexGuard<'_, ReturnDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read access to the current document state.
    pub fn with_document<R>(&self, f: impl FnOnce(&ReturnDocument) -> R) -> R {
        f(&self.doc())
    }

    /// Mutate the document directly (host-driven edits outside the
    /// calculator path, e.g. removing a line).
    pub fn update_document<R>(&self, f: impl FnOnce(&mut ReturnDocument) -> R) -> R {
        f(&mut self.doc())
    }

    /// Debounced candidate load: rapid repeated triggers are coalesced, and
    /// only the most recent one reaches the candidate service. `on_loaded`
    /// receives the fetched rows; failures and skips have already been
    /// notified or logged when it is not called.
    pub fn request_candidates<F>(self: &Arc<Self>, on_loaded: F)
    where
        F: FnOnce(Vec<InvoiceCandidate>) + Send + 'static,
    {
        let session = Arc::clone(self);
        self.debouncer.trigger(async move {
            match session.load_candidates().await {
                Ok(Some(candidates)) => on_loaded(candidates),
                Ok(None) => debug!("candidate load skipped: already in flight"),
                Err(_) => {} // surfaced via the notification sink
            }
        });
    }

    /// Fetch candidates for the document's current customer and filters.
    ///
    /// Preconditions: a customer must be set. With no invoice selected, no
    /// item filter, and `fetch_all` unset there is nothing to query and an
    /// empty list is returned without a remote call.
    ///
    /// Returns `Ok(None)` when a load is already in flight (reentrancy
    /// guard). The guard is released on failure so a retry is possible.
    pub async fn load_candidates(&self) -> Result<Option<Vec<InvoiceCandidate>>, RetoureError> {
        let query = {
            let doc = self.doc();
            let customer = match doc.customer.as_deref() {
                Some(c) if !c.trim().is_empty() => c.to_string(),
                _ => {
                    self.notifier
                        .notify(Notice::Error("customer is required".into()));
                    return Err(RetoureError::Precondition("customer is required".into()));
                }
            };
            CandidateQuery {
                customer,
                invoice: doc.source_invoice.clone(),
                item_code: doc.item_filter.clone(),
                fetch_all: doc.fetch_all,
            }
        };

        if !query.fetch_all && query.invoice.is_none() && query.item_code.is_none() {
            return Ok(Some(Vec::new()));
        }

        if self.loading.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        let result = self.source.fetch(&query).await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(candidates) => Ok(Some(candidates)),
            Err(err) => {
                error!(customer = %query.customer, %err, "candidate load failed");
                self.notifier
                    .notify(Notice::Error(format!("could not load invoice items: {err}")));
                Err(err)
            }
        }
    }

    /// Import the user's selection into the document, deduplicating by
    /// source line, and schedule a display-name refresh for each new line.
    /// Returns the number of lines actually added.
    pub async fn import_selected(
        &self,
        selected: Vec<InvoiceCandidate>,
    ) -> Result<usize, RetoureError> {
        if selected.is_empty() {
            self.notifier
                .notify(Notice::Error("no invoice items selected".into()));
            return Err(RetoureError::Precondition(
                "no invoice items selected".into(),
            ));
        }

        let (added, name_refreshes) = {
            let mut doc = self.doc();
            let existing = std::mem::take(&mut doc.lines);
            let ImportOutcome {
                lines,
                added,
                name_refreshes,
            } = import(selected, existing);
            doc.lines = lines;
            (added, name_refreshes)
        };

        self.notifier
            .notify(Notice::Info(format!("{added} item(s) added")));

        for refresh in name_refreshes {
            self.spawn_name_refresh(refresh);
        }

        Ok(added)
    }

    /// Recompute a line after its quantity was edited.
    ///
    /// Runs the calculator; if the input needed correction, the corrected
    /// quantity is persisted and notified first, then the one authoritative
    /// recompute runs on the settled value and its amounts are persisted.
    pub async fn quantity_changed(
        &self,
        source_line_id: &str,
        entered: Decimal,
    ) -> Result<ReturnAmounts, RetoureError> {
        let (rate, ctx) = {
            let doc = self.doc();
            let line = doc
                .line_by_source(source_line_id)
                .ok_or_else(|| RetoureError::UnknownLine(source_line_id.to_string()))?;
            (line.rate, line.context())
        };

        let qty = match compute(entered, rate, &ctx) {
            Computation::Settled(amounts) => {
                self.persist_amounts(source_line_id, &amounts)?;
                return Ok(amounts);
            }
            Computation::Corrected { qty, adjustments } => {
                {
                    let mut doc = self.doc();
                    let line = doc
                        .line_by_source_mut(source_line_id)
                        .ok_or_else(|| RetoureError::UnknownLine(source_line_id.to_string()))?;
                    line.qty = qty;
                }
                for adjustment in adjustments {
                    self.notifier.notify(Notice::Adjusted {
                        source_line_id: source_line_id.to_string(),
                        message: adjustment.to_string(),
                    });
                }
                qty
            }
        };

        match compute(qty, rate, &ctx) {
            Computation::Settled(amounts) => {
                self.persist_amounts(source_line_id, &amounts)?;
                Ok(amounts)
            }
            Computation::Corrected { .. } => Err(RetoureError::Validation(format!(
                "corrected quantity for {source_line_id} did not settle"
            ))),
        }
    }

    fn persist_amounts(
        &self,
        source_line_id: &str,
        amounts: &ReturnAmounts,
    ) -> Result<(), RetoureError> {
        let mut doc = self.doc();
        let line = doc
            .line_by_source_mut(source_line_id)
            .ok_or_else(|| RetoureError::UnknownLine(source_line_id.to_string()))?;
        line.apply(amounts);
        Ok(())
    }

    /// Fire-and-forget display-name lookup. The write-back re-acquires the
    /// document and is a no-op if the line has been removed meanwhile;
    /// registry failures keep the candidate-supplied name and stay silent.
    fn spawn_name_refresh(&self, refresh: NameRefresh) {
        let registry = Arc::clone(&self.registry);
        let document = Arc::clone(&self.document);
        tokio::spawn(async move {
            let name = match registry.display_name(&refresh.item_code).await {
                Ok(Some(name)) if !name.is_empty() => name,
                Ok(_) => return,
                Err(err) => {
                    debug!(item_code = %refresh.item_code, %err, "item name lookup failed");
                    return;
                }
            };
            let mut doc = document.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(line) = doc.line_by_source_mut(&refresh.source_line_id) {
                line.item_name = name;
            }
        });
    }
}
