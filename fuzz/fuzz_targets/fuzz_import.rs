#![no_main]

use libfuzzer_sys::fuzz_target;
use retoure::core::{import, InvoiceCandidateBuilder};
use rust_decimal::Decimal;

fuzz_target!(|rows: Vec<(u8, i32, i32, i32)>| {
    // Duplicate ids and extreme values must never panic the import path.
    let candidates = rows
        .into_iter()
        .map(|(id, qty, rate, cap)| {
            InvoiceCandidateBuilder::new(
                "SINV-FUZZ",
                format!("SINV-FUZZ-{id}"),
                Decimal::new(qty as i64, 2),
                Decimal::new(rate as i64, 2),
            )
            .max_returnable_qty(Decimal::new(cap as i64, 2))
            .build()
        })
        .collect();
    let outcome = import(candidates, Vec::new());
    assert!(outcome.added <= outcome.lines.len());
});
