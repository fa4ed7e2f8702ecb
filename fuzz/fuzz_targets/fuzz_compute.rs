#![no_main]

use libfuzzer_sys::fuzz_target;
use retoure::core::{settle, ReturnContext};
use rust_decimal::Decimal;

fuzz_target!(|input: (i32, u32, i32, u32, i32, i32, i32)| {
    let (q, qs, r, rs, cap, vat, oq) = input;
    // Must not panic — corrections and odd signs are fine, panics are bugs.
    let qty = Decimal::new(q as i64, qs % 10);
    let rate = Decimal::new(r as i64, rs % 10);
    let ctx = ReturnContext {
        max_returnable_qty: Decimal::new(cap as i64, 2),
        original_vat: Some(Decimal::new(vat as i64, 2)),
        original_qty: Some(Decimal::new(oq as i64, 2)),
        vat_ratio: Decimal::new(19, 2),
    };
    let _ = settle(qty, rate, &ctx);
});
