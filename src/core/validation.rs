//! Return document validation.
//!
//! Mirrors the submit-time checks of the host ERP: every line must carry a
//! negative quantity within its returnable cap, derived amounts must match
//! the calculator formulas, and source lines may appear at most once.
//! All errors are reported, not just the first.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::calc::round2;
use super::error::ValidationError;
use super::types::{ReturnDocument, ReturnLine};

/// Validate a return document. Returns all validation errors found.
pub fn validate_document(doc: &ReturnDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match &doc.customer {
        Some(c) if !c.trim().is_empty() => {}
        _ => errors.push(ValidationError::new("customer", "customer is required")),
    }

    if doc.lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "return must have at least one line",
        ));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (i, line) in doc.lines.iter().enumerate() {
        validate_line(line, i, &mut errors);

        if !seen.insert(line.source_line_id.as_str()) {
            errors.push(ValidationError::new(
                format!("lines[{i}].source_line_id"),
                format!(
                    "source line {} appears more than once",
                    line.source_line_id
                ),
            ));
        }
    }

    errors
}

fn validate_line(line: &ReturnLine, i: usize, errors: &mut Vec<ValidationError>) {
    if line.qty >= Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("lines[{i}].qty"),
            format!("({}) quantity must be a negative number", line.item_code),
        ));
    }

    if line.max_returnable_qty >= Decimal::ZERO && line.qty.abs() > line.max_returnable_qty {
        errors.push(ValidationError::new(
            format!("lines[{i}].qty"),
            format!(
                "({}) return quantity {} cannot exceed max returnable quantity {}",
                line.item_code,
                line.qty.abs(),
                line.max_returnable_qty
            ),
        ));
    }

    let expected_line_amount = round2(line.qty * line.rate);
    if line.line_amount != expected_line_amount {
        errors.push(ValidationError::new(
            format!("lines[{i}].line_amount"),
            format!(
                "line amount {} does not match round2(qty * rate) = {}",
                line.line_amount, expected_line_amount
            ),
        ));
    }

    let expected_total = -round2(line.line_amount + line.vat_amount).abs();
    if line.total_amount != expected_total {
        errors.push(ValidationError::new(
            format!("lines[{i}].total_amount"),
            format!(
                "total amount {} does not match -|line amount + VAT| = {}",
                line.total_amount, expected_total
            ),
        ));
    }
}
