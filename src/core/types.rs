use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One posted sales-invoice line eligible for return, as delivered by the
/// candidate query service. Read-only import source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCandidate {
    /// Source invoice identifier.
    pub invoice: String,
    /// Source invoice-line identifier — the dedup key for imports.
    pub source_line_id: String,
    /// Item code on the source line.
    pub item_code: Option<String>,
    /// Item registry identifier (fallback designation).
    pub item_id: Option<String>,
    /// Display name on the source line.
    pub item_name: Option<String>,
    pub description: Option<String>,
    /// Unit of measure.
    pub uom: Option<String>,
    /// Original invoiced quantity (non-negative).
    pub qty: Decimal,
    /// Unit rate.
    pub rate: Decimal,
    /// Original line amount.
    pub amount: Decimal,
    /// Returnable quantity cap. Defaults to the invoiced quantity when absent.
    pub max_returnable_qty: Option<Decimal>,
    /// Tax rate as a fraction of rate (e.g. 0.19 for 19%).
    pub vat_ratio: Decimal,
    /// VAT amount of the original invoice line.
    pub vat_amount: Decimal,
    /// Posting date of the source invoice.
    pub posting_date: Option<NaiveDate>,
}

/// One row of the return document's child collection.
///
/// Invariants (enforced by the calculator and checked by
/// [`validate_document`](crate::core::validate_document)):
/// `qty <= 0`, `qty.abs() <= max_returnable_qty`,
/// `line_amount = round2(qty * rate)`,
/// `total_amount = -round2(line_amount + vat_amount).abs()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnLine {
    /// Invoice the line is returned against.
    pub source_invoice: String,
    /// Source invoice-line identifier, unique within a document.
    pub source_line_id: String,
    /// Canonical item designation (code, registry id, or name — first
    /// non-empty).
    pub item_code: String,
    /// Display name cache; may be refreshed asynchronously from the item
    /// registry.
    pub item_name: String,
    pub description: Option<String>,
    pub uom: Option<String>,
    /// Quantity on the original invoice line.
    pub original_qty: Decimal,
    /// Returnable quantity cap, never negative for imported lines.
    pub max_returnable_qty: Decimal,
    pub rate: Decimal,
    /// Return quantity — always non-positive.
    pub qty: Decimal,
    /// Tax rate as a fraction of rate.
    pub vat_ratio: Decimal,
    /// VAT amount of the original invoice line.
    pub original_vat: Decimal,
    /// VAT amount for the return (non-positive when rate >= 0).
    pub vat_amount: Decimal,
    /// `round2(qty * rate)`.
    pub line_amount: Decimal,
    /// `-round2(line_amount + vat_amount).abs()` — always non-positive.
    pub total_amount: Decimal,
}

impl ReturnLine {
    /// Calculator context for recomputing this line's derived amounts.
    pub fn context(&self) -> super::calc::ReturnContext {
        super::calc::ReturnContext {
            max_returnable_qty: self.max_returnable_qty,
            original_vat: Some(self.original_vat),
            original_qty: Some(self.original_qty),
            vat_ratio: self.vat_ratio,
        }
    }

    /// Write back a settled computation.
    pub fn apply(&mut self, amounts: &super::calc::ReturnAmounts) {
        self.qty = amounts.qty;
        self.vat_amount = amounts.vat_amount;
        self.line_amount = amounts.line_amount;
        self.total_amount = amounts.total_amount;
    }
}

/// The return document: customer context, candidate-query filters, and the
/// child line collection.
///
/// The schema is static and versioned with the crate — optional fields are
/// explicit `Option`s, not runtime metadata lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnDocument {
    /// Customer the return is for. Required before candidates can be loaded.
    pub customer: Option<String>,
    /// Restricts candidate loading to a single invoice.
    pub source_invoice: Option<String>,
    /// Restrict candidates to one item code (searches all invoices of the
    /// customer).
    pub item_filter: Option<String>,
    /// Pull candidates from every posted invoice of the customer.
    pub fetch_all: bool,
    /// Child rows.
    pub lines: Vec<ReturnLine>,
}

impl ReturnDocument {
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: Some(customer.into()),
            ..Self::default()
        }
    }

    pub fn line_by_source(&self, source_line_id: &str) -> Option<&ReturnLine> {
        self.lines
            .iter()
            .find(|l| l.source_line_id == source_line_id)
    }

    pub fn line_by_source_mut(&mut self, source_line_id: &str) -> Option<&mut ReturnLine> {
        self.lines
            .iter_mut()
            .find(|l| l.source_line_id == source_line_id)
    }

    /// Remove a line by source identifier, returning it if present.
    pub fn remove_line(&mut self, source_line_id: &str) -> Option<ReturnLine> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.source_line_id == source_line_id)?;
        Some(self.lines.remove(idx))
    }
}
