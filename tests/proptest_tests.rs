//! Property-based tests for the calculator and the import path.

use proptest::prelude::*;
use retoure::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Quantity with cent granularity, 0.01 to 999.99.
fn arb_qty() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|n| Decimal::new(n, 2))
}

/// Rate with cent granularity, 0.00 to 9999.99.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|n| Decimal::new(n, 2))
}

/// VAT ratio between 0 and 0.25.
fn arb_ratio() -> impl Strategy<Value = Decimal> {
    (0i64..=2500).prop_map(|n| Decimal::new(n, 4))
}

fn ratio_ctx(cap: Decimal, ratio: Decimal) -> ReturnContext {
    ReturnContext {
        max_returnable_qty: cap,
        original_vat: None,
        original_qty: None,
        vat_ratio: ratio,
    }
}

proptest! {
    /// Any positive quantity comes back negated.
    #[test]
    fn positive_quantities_are_negated(q in arb_qty(), rate in arb_rate()) {
        // Cap above q so only the sign rule fires.
        let ctx = ratio_ctx(q + dec!(1), dec!(0.19));
        let Computation::Corrected { qty, adjustments } = compute(q, rate, &ctx) else {
            return Err(TestCaseError::fail("positive quantity must be corrected"));
        };
        prop_assert_eq!(qty, -q);
        let sign_flipped = adjustments.iter().any(|a| matches!(a, Adjustment::SignFlipped { .. }));
        prop_assert!(sign_flipped);
    }

    /// Any over-cap magnitude is clamped to the cap.
    #[test]
    fn over_cap_is_clamped(cap in arb_qty(), excess in arb_qty(), rate in arb_rate()) {
        let ctx = ratio_ctx(cap, dec!(0.19));
        let q = -(cap + excess);
        let Computation::Corrected { qty, .. } = compute(q, rate, &ctx) else {
            return Err(TestCaseError::fail("over-cap quantity must be corrected"));
        };
        prop_assert_eq!(qty, -cap);
    }

    /// Settled amounts are never positive for a non-positive quantity and
    /// non-negative rate.
    #[test]
    fn settled_amounts_are_non_positive(
        q in arb_qty(),
        rate in arb_rate(),
        ratio in arb_ratio(),
    ) {
        let ctx = ratio_ctx(q, ratio);
        let Computation::Settled(amounts) = compute(-q, rate, &ctx) else {
            return Err(TestCaseError::fail("within-cap negative quantity must settle"));
        };
        prop_assert!(amounts.line_amount <= Decimal::ZERO);
        prop_assert!(amounts.vat_amount <= Decimal::ZERO);
        prop_assert!(amounts.total_amount <= Decimal::ZERO);
    }

    /// Settled computation is idempotent and amounts carry at most 2
    /// decimal places.
    #[test]
    fn settled_computation_is_idempotent_and_2dp(
        q in arb_qty(),
        rate in arb_rate(),
        ratio in arb_ratio(),
    ) {
        let ctx = ratio_ctx(q, ratio);
        let first = compute(-q, rate, &ctx);
        let second = compute(-q, rate, &ctx);
        prop_assert_eq!(&first, &second);

        let Computation::Settled(amounts) = first else {
            return Err(TestCaseError::fail("within-cap negative quantity must settle"));
        };
        prop_assert!(amounts.line_amount.scale() <= 2);
        prop_assert!(amounts.vat_amount.scale() <= 2);
        prop_assert!(amounts.total_amount.scale() <= 2);
    }

    /// `settle` always lands in [-cap, 0].
    #[test]
    fn settle_lands_within_bounds(
        q in -1000i64..1000i64,
        cap in 0i64..100,
        rate in arb_rate(),
    ) {
        let q = Decimal::from(q);
        let cap = Decimal::from(cap);
        let (amounts, _) = settle(q, rate, &ratio_ctx(cap, dec!(0.07)));
        prop_assert!(amounts.qty <= Decimal::ZERO);
        prop_assert!(amounts.qty.abs() <= cap);
    }

    /// Importing the same batch twice never adds a second copy.
    #[test]
    fn reimport_adds_nothing(qty in arb_qty(), rate in arb_rate(), ratio in arb_ratio()) {
        let candidate = InvoiceCandidateBuilder::new("SINV-P", "SINV-P-1", qty, rate)
            .item_code("ITEM")
            .vat_ratio(ratio)
            .build();
        let first = import(vec![candidate.clone()], Vec::new());
        prop_assert_eq!(first.added, 1);
        let second = import(vec![candidate], first.lines);
        prop_assert_eq!(second.added, 0);
        prop_assert_eq!(second.lines.len(), 1);
    }
}
