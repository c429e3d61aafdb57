use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::AppraisalError;
use crate::types::{Money, Rate};
use crate::AppraisalResult;

/// NPV tolerance relative to the largest absolute cash flow.
const NPV_RELATIVE_TOLERANCE: Decimal = dec!(0.0000000001);
const RATE_TOLERANCE: Decimal = dec!(0.000000001);
const MAX_BISECTION_ITERATIONS: u32 = 200;
const MAX_BRACKET_DOUBLINGS: u32 = 32;

/// Lower edge of the IRR search bracket (-99%).
pub const IRR_BRACKET_LOW: Rate = dec!(-0.99);
/// Upper edge of the fixed IRR grid (+1000%). Widened by doubling when NPV
/// has not yet turned towards the first cash flow's sign.
pub const IRR_BRACKET_HIGH: Rate = dec!(10);

fn check_rate(rate: Rate) -> AppraisalResult<()> {
    if rate <= dec!(-1) {
        return Err(AppraisalError::InvalidRate { rate });
    }
    Ok(())
}

/// Each cash flow multiplied by `v^t` with `v = 1 / (1 + rate)`, where `t` is
/// its index in the series.
///
/// For positive rates `v^t` shrinks, so far-off terms round towards zero
/// instead of overflowing. Negative rates make `v^t` grow and can still leave
/// the decimal range.
pub fn discounted_flows(rate: Rate, cash_flows: &[Money]) -> AppraisalResult<Vec<Money>> {
    check_rate(rate)?;

    let v = Decimal::ONE
        .checked_div(Decimal::ONE + rate)
        .ok_or_else(|| AppraisalError::DivisionByZero {
            context: format!("discount factor at rate {rate}"),
        })?;
    let mut factor = Decimal::ONE;
    let mut discounted = Vec::with_capacity(cash_flows.len());

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            factor = factor
                .checked_mul(v)
                .ok_or_else(|| AppraisalError::NumericOverflow {
                    context: format!("discount factor at period {t}"),
                })?;
        }
        let pv = cf
            .checked_mul(factor)
            .ok_or_else(|| AppraisalError::NumericOverflow {
                context: format!("present value at period {t}"),
            })?;
        discounted.push(pv);
    }

    Ok(discounted)
}

/// Net Present Value of a series of cash flows. Index 0 is undiscounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> AppraisalResult<Money> {
    discounted_flows(rate, cash_flows)?
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, pv| acc.checked_add(pv))
        .ok_or_else(|| AppraisalError::NumericOverflow {
            context: "NPV sum".into(),
        })
}

/// Internal Rate of Return as a decimal rate.
///
/// NPV is sampled on a fixed grid between [`IRR_BRACKET_LOW`] and
/// [`IRR_BRACKET_HIGH`]; every sign change is refined by bisection. When the
/// series has several roots (more than one sign change in the flows) the
/// root closest to zero is returned. Grid points where NPV cannot be
/// represented in 128-bit decimal are skipped.
///
/// If the grid finds no root and NPV at the top of the grid still has the
/// opposite sign to the first cash flow (its limit as the rate grows), the
/// upper edge is doubled until NPV crosses zero.
pub fn irr(cash_flows: &[Money]) -> AppraisalResult<Rate> {
    let has_positive = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    let has_negative = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    if !has_positive || !has_negative {
        return Err(AppraisalError::NoRoot(
            "cash flows never change sign".into(),
        ));
    }

    let mut roots: Vec<Rate> = Vec::new();
    let mut previous: Option<(Rate, Money)> = None;

    for rate in bracket_grid() {
        let value = match npv(rate, cash_flows) {
            Ok(v) => v,
            Err(_) => {
                previous = None;
                continue;
            }
        };

        if value.is_zero() {
            roots.push(rate);
        } else if let Some((prev_rate, prev_value)) = previous {
            if !prev_value.is_zero() && prev_value.is_sign_negative() != value.is_sign_negative() {
                if let Some(root) = bisect(cash_flows, prev_rate, prev_value, rate) {
                    roots.push(root);
                }
            }
        }

        previous = Some((rate, value));
    }

    if roots.is_empty() {
        if let Some((high, value)) = previous.filter(|(rate, _)| *rate == IRR_BRACKET_HIGH) {
            if let Some(root) = widen_upper_bracket(cash_flows, high, value) {
                roots.push(root);
            }
        }
    }

    roots.into_iter().min_by_key(|r| r.abs()).ok_or_else(|| {
        AppraisalError::NoRoot(format!(
            "NPV does not cross zero for rates between {IRR_BRACKET_LOW} and {IRR_BRACKET_HIGH}"
        ))
    })
}

/// Sample points for the IRR bracket search: 5% steps up to 100%, then 25% steps.
fn bracket_grid() -> Vec<Rate> {
    let mut grid = vec![IRR_BRACKET_LOW];
    let mut rate = dec!(-0.95);
    while rate < Decimal::ONE {
        grid.push(rate);
        rate += dec!(0.05);
    }
    while rate <= IRR_BRACKET_HIGH {
        grid.push(rate);
        rate += dec!(0.25);
    }
    grid
}

/// Doubles the upper edge from `high` while NPV keeps the sign it has there,
/// then bisects the last interval. Only tried when NPV at `high` and the
/// first cash flow have opposite signs, since NPV tends to that flow.
fn widen_upper_bracket(cash_flows: &[Money], mut high: Rate, mut npv_high: Money) -> Option<Rate> {
    let first = *cash_flows.first()?;
    if first.is_zero() || npv_high.is_zero() || first.is_sign_negative() == npv_high.is_sign_negative() {
        return None;
    }

    for _ in 0..MAX_BRACKET_DOUBLINGS {
        let next = high.checked_mul(dec!(2))?;
        let value = npv(next, cash_flows).ok()?;
        if value.is_zero() {
            return Some(next);
        }
        if value.is_sign_negative() != npv_high.is_sign_negative() {
            return bisect(cash_flows, high, npv_high, next);
        }
        high = next;
        npv_high = value;
    }

    None
}

/// Bisection on `[low, high]`, where NPV changes sign. Stops on NPV or rate
/// tolerance, or after `MAX_BISECTION_ITERATIONS` with the best midpoint.
/// The NPV tolerance scales with the largest absolute cash flow.
fn bisect(cash_flows: &[Money], mut low: Rate, mut npv_low: Money, mut high: Rate) -> Option<Rate> {
    let scale = cash_flows
        .iter()
        .map(|cf| cf.abs())
        .max()
        .unwrap_or(Decimal::ONE);
    let npv_tolerance = NPV_RELATIVE_TOLERANCE * scale;

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let npv_mid = npv(mid, cash_flows).ok()?;

        if npv_mid.abs() < npv_tolerance || (high - low) / dec!(2) < RATE_TOLERANCE {
            return Some(mid);
        }

        if npv_mid.is_sign_negative() == npv_low.is_sign_negative() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    Some((low + high) / dec!(2))
}
