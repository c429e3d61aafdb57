use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppraisalError;
use crate::time_value::discounted_flows;
use crate::types::{Money, Rate, Years};
use crate::AppraisalResult;

/// Time needed for cumulative cash flow to turn positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payback {
    /// Fractional years, interpolated linearly inside the recovery year
    Recovered(Years),
    /// Cumulative cash flow stays at or below zero for the whole series
    NeverRecovers,
}

impl Payback {
    pub fn years(&self) -> Option<Years> {
        match self {
            Payback::Recovered(y) => Some(*y),
            Payback::NeverRecovers => None,
        }
    }
}

/// Simple payback period.
///
/// With `C[k]` the cumulative flow through year `k` and `k` the first year
/// where `C[k] > 0`, the result is `(k - 1) + (-C[k-1]) / flow[k]`: the
/// outstanding balance at the start of year `k` is recovered evenly over that
/// year. A series that is already positive in year 0 pays back at 0.
pub fn payback_period(cash_flows: &[Money]) -> AppraisalResult<Payback> {
    let mut cumulative = Decimal::ZERO;

    for (k, cf) in cash_flows.iter().enumerate() {
        let outstanding = cumulative;
        cumulative = cumulative
            .checked_add(*cf)
            .ok_or_else(|| AppraisalError::NumericOverflow {
                context: format!("cumulative cash flow at year {k}"),
            })?;

        if cumulative > Decimal::ZERO {
            if k == 0 {
                return Ok(Payback::Recovered(Decimal::ZERO));
            }
            // outstanding <= 0 < cumulative, so cf > 0
            let fraction = -outstanding / *cf;
            return Ok(Payback::Recovered(Decimal::from(k as u64 - 1) + fraction));
        }
    }

    Ok(Payback::NeverRecovers)
}

/// Payback period over the series discounted at `rate`.
pub fn discounted_payback_period(rate: Rate, cash_flows: &[Money]) -> AppraisalResult<Payback> {
    let discounted = discounted_flows(rate, cash_flows)?;
    payback_period(&discounted)
}
