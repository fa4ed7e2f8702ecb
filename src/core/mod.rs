//! Core return-line types, calculator, import, validation, and credit-note
//! grouping.
//!
//! Everything here is pure, synchronous, in-memory logic. The asynchronous
//! orchestration (debounced candidate loading, name refresh) lives in the
//! `document` feature.

mod builder;
mod calc;
mod credit;
mod error;
mod import;
mod types;
mod validation;

pub use builder::*;
pub use calc::*;
pub use credit::*;
pub use error::*;
pub use import::*;
pub use types::*;
pub use validation::*;
