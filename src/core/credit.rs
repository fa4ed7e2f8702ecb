//! Credit-note drafts.
//!
//! Groups a return document's lines by source invoice and shapes each group
//! into a draft the host ERP can post as a credit note (a return invoice
//! against the original). Lines without an invoice link are skipped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::round2;
use super::types::ReturnDocument;

/// One line of a credit-note draft. Quantities are always negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteLine {
    pub item_code: String,
    pub item_name: String,
    pub uom: Option<String>,
    pub qty: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
    pub vat_amount: Decimal,
}

/// A credit note to be raised against one source invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteDraft {
    /// The invoice this credit note returns against.
    pub return_against: String,
    pub customer: Option<String>,
    pub lines: Vec<CreditNoteLine>,
    /// Sum of line amounts (non-positive).
    pub net_total: Decimal,
    /// Sum of line VAT amounts (non-positive).
    pub vat_total: Decimal,
    /// `round2(net_total + vat_total)`.
    pub grand_total: Decimal,
}

/// Build one credit-note draft per source invoice, in first-seen line order.
pub fn credit_note_drafts(doc: &ReturnDocument) -> Vec<CreditNoteDraft> {
    let mut drafts: Vec<CreditNoteDraft> = Vec::new();

    for line in &doc.lines {
        if line.source_invoice.is_empty() {
            continue;
        }

        let qty = if line.qty > Decimal::ZERO {
            -line.qty.abs()
        } else {
            line.qty
        };
        let note_line = CreditNoteLine {
            item_code: line.item_code.clone(),
            item_name: line.item_name.clone(),
            uom: line.uom.clone(),
            qty,
            rate: line.rate,
            amount: line.line_amount,
            vat_amount: line.vat_amount,
        };

        match drafts
            .iter_mut()
            .find(|d| d.return_against == line.source_invoice)
        {
            Some(draft) => draft.lines.push(note_line),
            None => drafts.push(CreditNoteDraft {
                return_against: line.source_invoice.clone(),
                customer: doc.customer.clone(),
                lines: vec![note_line],
                net_total: Decimal::ZERO,
                vat_total: Decimal::ZERO,
                grand_total: Decimal::ZERO,
            }),
        }
    }

    for draft in &mut drafts {
        draft.net_total = round2(draft.lines.iter().map(|l| l.amount).sum());
        draft.vat_total = round2(draft.lines.iter().map(|l| l.vat_amount).sum());
        draft.grand_total = round2(draft.net_total + draft.vat_total);
    }

    drafts
}
