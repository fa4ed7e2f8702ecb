use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::InvoiceCandidate;

/// Builder for [`InvoiceCandidate`] — handy for hosts assembling candidate
/// rows from their own query layer, and for tests.
///
/// ```
/// use retoure::core::InvoiceCandidateBuilder;
/// use rust_decimal_macros::dec;
///
/// let candidate = InvoiceCandidateBuilder::new("SINV-0001", "SINV-0001-1", dec!(10), dec!(5))
///     .item_code("WIDGET")
///     .vat_ratio(dec!(0.19))
///     .build();
/// assert_eq!(candidate.amount, dec!(50));
/// ```
pub struct InvoiceCandidateBuilder {
    invoice: String,
    source_line_id: String,
    item_code: Option<String>,
    item_id: Option<String>,
    item_name: Option<String>,
    description: Option<String>,
    uom: Option<String>,
    qty: Decimal,
    rate: Decimal,
    amount: Option<Decimal>,
    max_returnable_qty: Option<Decimal>,
    vat_ratio: Decimal,
    vat_amount: Decimal,
    posting_date: Option<NaiveDate>,
}

impl InvoiceCandidateBuilder {
    pub fn new(
        invoice: impl Into<String>,
        source_line_id: impl Into<String>,
        qty: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            invoice: invoice.into(),
            source_line_id: source_line_id.into(),
            item_code: None,
            item_id: None,
            item_name: None,
            description: None,
            uom: None,
            qty,
            rate,
            amount: None,
            max_returnable_qty: None,
            vat_ratio: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            posting_date: None,
        }
    }

    pub fn item_code(mut self, code: impl Into<String>) -> Self {
        self.item_code = Some(code.into());
        self
    }

    pub fn item_id(mut self, id: impl Into<String>) -> Self {
        self.item_id = Some(id.into());
        self
    }

    pub fn item_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    /// Original line amount. Defaults to `qty * rate` when not set.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn max_returnable_qty(mut self, qty: Decimal) -> Self {
        self.max_returnable_qty = Some(qty);
        self
    }

    pub fn vat_ratio(mut self, ratio: Decimal) -> Self {
        self.vat_ratio = ratio;
        self
    }

    pub fn vat_amount(mut self, amount: Decimal) -> Self {
        self.vat_amount = amount;
        self
    }

    pub fn posting_date(mut self, date: NaiveDate) -> Self {
        self.posting_date = Some(date);
        self
    }

    pub fn build(self) -> InvoiceCandidate {
        let amount = self.amount.unwrap_or(self.qty * self.rate);
        InvoiceCandidate {
            invoice: self.invoice,
            source_line_id: self.source_line_id,
            item_code: self.item_code,
            item_id: self.item_id,
            item_name: self.item_name,
            description: self.description,
            uom: self.uom,
            qty: self.qty,
            rate: self.rate,
            amount,
            max_returnable_qty: self.max_returnable_qty,
            vat_ratio: self.vat_ratio,
            vat_amount: self.vat_amount,
            posting_date: self.posting_date,
        }
    }
}
