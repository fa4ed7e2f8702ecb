//! Item import with dedup by source invoice line.
//!
//! Consumes candidate invoice lines, skips those already present in the
//! document (same `source_line_id`), and seeds each new return line through
//! the calculator. Pure and synchronous — the asynchronous item-name
//! refresh is only *recorded* here (as [`NameRefresh`] entries) and
//! scheduled by the session layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::{settle, ReturnContext};
use super::types::{InvoiceCandidate, ReturnLine};

/// A deferred display-name lookup for a freshly imported line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRefresh {
    pub source_line_id: String,
    /// Canonical item code to look up in the item registry.
    pub item_code: String,
}

/// Result of one import pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// The full updated line set: existing lines followed by newly added
    /// ones, in candidate input order.
    pub lines: Vec<ReturnLine>,
    /// Number of lines actually added (duplicates are skipped silently).
    pub added: usize,
    /// Display-name lookups to schedule, one per added line with a
    /// non-empty item designation.
    pub name_refreshes: Vec<NameRefresh>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Canonical item designation: item code, else registry identifier, else
/// display name — first non-empty, in that priority order. Empty only when
/// all three are absent.
pub fn canonical_item_code(candidate: &InvoiceCandidate) -> String {
    non_empty(&candidate.item_code)
        .or_else(|| non_empty(&candidate.item_id))
        .or_else(|| non_empty(&candidate.item_name))
        .unwrap_or_default()
        .to_string()
}

/// Import candidates into the line set, deduplicating by source line.
///
/// Re-importing a candidate whose `source_line_id` is already present
/// (in `existing` or earlier in `candidates`) is a no-op, not an error.
pub fn import(candidates: Vec<InvoiceCandidate>, existing: Vec<ReturnLine>) -> ImportOutcome {
    let mut lines = existing;
    let mut added = 0;
    let mut name_refreshes = Vec::new();

    for candidate in candidates {
        if lines
            .iter()
            .any(|l| l.source_line_id == candidate.source_line_id)
        {
            continue;
        }

        let item_code = canonical_item_code(&candidate);
        let original_qty = candidate.qty;
        let max_returnable_qty = candidate
            .max_returnable_qty
            .unwrap_or(original_qty)
            .max(Decimal::ZERO);

        // Start at the full returnable quantity, pre-clamped so the
        // calculator settles on the first pass.
        let desired = original_qty.min(max_returnable_qty);
        let qty = -desired.abs();

        let ctx = ReturnContext {
            max_returnable_qty,
            original_vat: Some(candidate.vat_amount),
            original_qty: Some(original_qty),
            vat_ratio: candidate.vat_ratio,
        };
        let (amounts, _) = settle(qty, candidate.rate, &ctx);

        if !item_code.is_empty() {
            name_refreshes.push(NameRefresh {
                source_line_id: candidate.source_line_id.clone(),
                item_code: item_code.clone(),
            });
        }

        lines.push(ReturnLine {
            source_invoice: candidate.invoice,
            source_line_id: candidate.source_line_id,
            item_code,
            item_name: candidate.item_name.unwrap_or_default(),
            description: candidate.description,
            uom: candidate.uom,
            original_qty,
            max_returnable_qty,
            rate: candidate.rate,
            qty: amounts.qty,
            vat_ratio: candidate.vat_ratio,
            original_vat: candidate.vat_amount,
            vat_amount: amounts.vat_amount,
            line_amount: amounts.line_amount,
            total_amount: amounts.total_amount,
        });
        added += 1;
    }

    ImportOutcome {
        lines,
        added,
        name_refreshes,
    }
}
