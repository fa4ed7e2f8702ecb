use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{InvoiceCandidate, RetoureError};

/// Query for the candidate service. Exactly one of `invoice`, `item_code`,
/// or `fetch_all` narrows the search; an item filter searches every posted
/// invoice of the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub customer: String,
    pub invoice: Option<String>,
    pub item_code: Option<String>,
    pub fetch_all: bool,
}

/// Source of invoice candidates (server-side join across invoices, items,
/// and taxes — an implementation detail of the collaborator).
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<InvoiceCandidate>, RetoureError>;
}

/// Authoritative item registry, keyed by canonical item code.
#[async_trait]
pub trait ItemRegistry: Send + Sync {
    /// Display name for an item code. `Ok(None)` means "not found" — never
    /// an error.
    async fn display_name(&self, item_code: &str) -> Result<Option<String>, RetoureError>;
}

/// Short, non-blocking user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// An input was silently corrected ("input adjusted", not an error).
    Adjusted {
        source_line_id: String,
        message: String,
    },
    Info(String),
    Error(String),
}

/// Sink for user-facing notices. Implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}
