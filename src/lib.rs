//! # retoure
//!
//! Sales-return line calculation and invoice-item import: pull line items
//! from posted sales invoices into a return document, normalize return
//! quantities (always negative, capped at the returnable quantity), prorate
//! VAT, and group the result into credit-note drafts per source invoice.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use retoure::core::*;
//! use rust_decimal_macros::dec;
//!
//! let candidate = InvoiceCandidateBuilder::new("SINV-0001", "SINV-0001-1", dec!(10), dec!(5))
//!     .item_code("WIDGET")
//!     .vat_amount(dec!(10))
//!     .build();
//!
//! let outcome = import(vec![candidate], Vec::new());
//! assert_eq!(outcome.added, 1);
//!
//! let line = &outcome.lines[0];
//! assert_eq!(line.qty, dec!(-10));
//! assert_eq!(line.line_amount, dec!(-50.00));
//! assert_eq!(line.vat_amount, dec!(-10.00));
//! assert_eq!(line.total_amount, dec!(-60.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Calculator, import/dedup, validation, credit-note drafts |
//! | `document` | Async session: debounced candidate loading, quantity-change trigger, item-name refresh |
//! | `remote` | HTTP clients for the candidate query service and item registry |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "document")]
pub mod document;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
