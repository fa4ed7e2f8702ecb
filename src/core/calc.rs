//! Return line calculator.
//!
//! Pure arithmetic over a single line: normalizes the return quantity
//! (always negative, capped at the returnable quantity), prorates VAT from
//! the original invoice line, and derives line and total amounts with
//! commercial rounding. The caller persists results and surfaces any
//! [`Adjustment`] notices — the calculator performs no I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs beyond quantity and rate needed to derive amounts for a line.
#[derive(Debug, Clone)]
pub struct ReturnContext {
    /// Cap on the return magnitude. A negative cap means "no cap configured"
    /// and disables enforcement.
    pub max_returnable_qty: Decimal,
    /// VAT amount of the original invoice line, if known.
    pub original_vat: Option<Decimal>,
    /// Quantity of the original invoice line, if known.
    pub original_qty: Option<Decimal>,
    /// Fallback tax rate as a fraction of rate, used when the original VAT
    /// or quantity is unavailable or zero.
    pub vat_ratio: Decimal,
}

/// A user-visible input correction. Not an error — processing continues
/// with the corrected quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    /// A positive quantity was entered and flipped negative.
    SignFlipped { entered: Decimal },
    /// The quantity magnitude exceeded the returnable cap and was clamped.
    Capped { entered: Decimal, cap: Decimal },
}

impl std::fmt::Display for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignFlipped { entered } => {
                write!(f, "return quantity must be negative; {entered} was negated")
            }
            Self::Capped { entered, cap } => write!(
                f,
                "return quantity {entered} cannot exceed max returnable quantity {cap}"
            ),
        }
    }
}

/// Derived amounts for a settled (negative, within-cap) quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnAmounts {
    /// The settled quantity the amounts were derived from.
    pub qty: Decimal,
    /// VAT amount for the return.
    pub vat_amount: Decimal,
    /// `round2(qty * rate)`.
    pub line_amount: Decimal,
    /// `-round2(line_amount + vat_amount).abs()`.
    pub total_amount: Decimal,
}

/// Result of one calculator pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Computation {
    /// The input quantity required correction. Only the corrected quantity
    /// is populated; the caller must persist it, surface the adjustments,
    /// and re-invoke [`compute`] with the settled value before deriving
    /// amounts. This keeps the one authoritative recompute on settled input
    /// and avoids double-correction.
    Corrected {
        qty: Decimal,
        adjustments: Vec<Adjustment>,
    },
    /// The quantity was already settled; amounts are fully derived.
    Settled(ReturnAmounts),
}

/// Round to 2 decimal places using half-up (commercial rounding).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Compute derived amounts for one return line.
///
/// A negative `rate` is accepted and propagates through the arithmetic
/// unchanged — unusual, but not the calculator's call to reject.
///
/// ```
/// use retoure::core::{compute, Computation, ReturnContext};
/// use rust_decimal_macros::dec;
///
/// let ctx = ReturnContext {
///     max_returnable_qty: dec!(10),
///     original_vat: Some(dec!(10)),
///     original_qty: Some(dec!(10)),
///     vat_ratio: dec!(0.19),
/// };
/// let Computation::Settled(amounts) = compute(dec!(-4), dec!(5), &ctx) else {
///     panic!("pre-settled input");
/// };
/// assert_eq!(amounts.vat_amount, dec!(-4.00));
/// assert_eq!(amounts.line_amount, dec!(-20.00));
/// assert_eq!(amounts.total_amount, dec!(-24.00));
/// ```
pub fn compute(qty: Decimal, rate: Decimal, ctx: &ReturnContext) -> Computation {
    let entered = qty;
    let mut qty = qty;
    let mut adjustments = Vec::new();

    // Sign normalization: returns are always negative quantities.
    if qty > Decimal::ZERO {
        adjustments.push(Adjustment::SignFlipped { entered });
        qty = -qty.abs();
    }

    // Cap enforcement. A negative cap means no cap is configured.
    if ctx.max_returnable_qty >= Decimal::ZERO && qty.abs() > ctx.max_returnable_qty {
        adjustments.push(Adjustment::Capped {
            entered,
            cap: ctx.max_returnable_qty,
        });
        qty = -ctx.max_returnable_qty.abs();
    }

    if qty != entered {
        return Computation::Corrected { qty, adjustments };
    }

    // VAT: prorate the original VAT by quantity magnitude when both the
    // original VAT and quantity are known and non-zero; otherwise fall back
    // to the ratio, sign following the quantity.
    let vat_amount = match (ctx.original_vat, ctx.original_qty) {
        (Some(original_vat), Some(original_qty))
            if !original_vat.is_zero() && !original_qty.is_zero() =>
        {
            -round2(original_vat * (qty.abs() / original_qty)).abs()
        }
        _ => round2(qty * rate * ctx.vat_ratio),
    };

    let line_amount = round2(qty * rate);
    let total_amount = -round2(line_amount + vat_amount).abs();

    Computation::Settled(ReturnAmounts {
        qty,
        vat_amount,
        line_amount,
        total_amount,
    })
}

/// Run [`compute`] to a settled result, collecting any adjustments along the
/// way. Converges in at most two passes: a corrected quantity always passes
/// both the sign and cap checks on re-entry.
pub fn settle(
    qty: Decimal,
    rate: Decimal,
    ctx: &ReturnContext,
) -> (ReturnAmounts, Vec<Adjustment>) {
    let mut qty = qty;
    let mut collected = Vec::new();
    loop {
        match compute(qty, rate, ctx) {
            Computation::Settled(amounts) => return (amounts, collected),
            Computation::Corrected {
                qty: corrected,
                adjustments,
            } => {
                collected.extend(adjustments);
                qty = corrected;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ctx_ratio(cap: Decimal, ratio: Decimal) -> ReturnContext {
        ReturnContext {
            max_returnable_qty: cap,
            original_vat: None,
            original_qty: None,
            vat_ratio: ratio,
        }
    }

    #[test]
    fn round2_half_up() {
        assert_eq!(round2(dec!(2.345)), dec!(2.35));
        assert_eq!(round2(dec!(2.344)), dec!(2.34));
        assert_eq!(round2(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn zero_original_qty_falls_back_to_ratio() {
        let ctx = ReturnContext {
            max_returnable_qty: dec!(5),
            original_vat: Some(dec!(7)),
            original_qty: Some(dec!(0)),
            vat_ratio: dec!(0.1),
        };
        let Computation::Settled(amounts) = compute(dec!(-5), dec!(8), &ctx) else {
            panic!("settled input");
        };
        // -5 * 8 * 0.1 = -4
        assert_eq!(amounts.vat_amount, dec!(-4.00));
    }

    #[test]
    fn negative_cap_disables_enforcement() {
        let ctx = ctx_ratio(dec!(-1), dec!(0));
        let Computation::Settled(amounts) = compute(dec!(-1000), dec!(2), &ctx) else {
            panic!("no cap configured");
        };
        assert_eq!(amounts.qty, dec!(-1000));
        assert_eq!(amounts.line_amount, dec!(-2000.00));
    }

    #[test]
    fn settle_collects_both_adjustments() {
        let ctx = ctx_ratio(dec!(3), dec!(0));
        let (amounts, adjustments) = settle(dec!(15), dec!(1), &ctx);
        assert_eq!(amounts.qty, dec!(-3));
        assert_eq!(adjustments.len(), 2);
        assert!(matches!(adjustments[0], Adjustment::SignFlipped { .. }));
        assert!(matches!(adjustments[1], Adjustment::Capped { .. }));
    }

    #[test]
    fn negative_rate_propagates() {
        let ctx = ctx_ratio(dec!(10), dec!(0.5));
        let Computation::Settled(amounts) = compute(dec!(-2), dec!(-3), &ctx) else {
            panic!("settled input");
        };
        // -2 * -3 = 6 — accepted-but-unusual, not rejected.
        assert_eq!(amounts.line_amount, dec!(6.00));
        assert_eq!(amounts.vat_amount, dec!(3.00));
        assert_eq!(amounts.total_amount, dec!(-9.00));
    }
}
