use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::metrics::evaluator::{evaluate, FinancialMetrics};
use crate::metrics::payback::Payback;
use crate::projection::cash_flow::{project, CashFlowSeries};
use crate::projection::parameters::ProjectParameters;
use crate::types::{with_metadata, ComputationOutput};
use crate::AppraisalResult;

/// Output of a full project appraisal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalOutput {
    /// Year-by-year projected cash flows
    pub cash_flows: CashFlowSeries,
    /// NPV, IRR, PP and DPP at the project's discount rate
    pub metrics: FinancialMetrics,
}

/// Project the cash flows of a business plan and evaluate them at its WACC.
///
/// Projection errors abort the appraisal; metric errors are carried inside
/// [`FinancialMetrics`] and echoed as warnings.
pub fn appraise(
    input: &ProjectParameters,
) -> AppraisalResult<ComputationOutput<AppraisalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let cash_flows = project(input)?;
    let metrics = evaluate(&cash_flows, input.discount_rate);

    if input.annual_revenue < input.annual_cost {
        warnings.push(
            "Annual cost exceeds annual revenue; every operating year is loss-making".into(),
        );
    }
    if input.discount_rate < Decimal::ZERO {
        warnings.push(format!(
            "Discount rate {} is negative; discounted figures exceed nominal ones",
            input.discount_rate
        ));
    }
    if let Some(npv) = metrics.npv.value() {
        if *npv < Decimal::ZERO {
            warnings.push(format!(
                "NPV is negative ({npv:.2}); the project does not earn its cost of capital"
            ));
        }
    }
    if metrics.payback_period.value() == Some(&Payback::NeverRecovers) {
        warnings.push("Investment is never recovered within the project life".into());
    } else if metrics.discounted_payback_period.value() == Some(&Payback::NeverRecovers) {
        warnings.push(
            "Investment is never recovered on a discounted basis within the project life".into(),
        );
    }
    for (name, reason) in metrics.undefined_metrics() {
        warnings.push(format!("{name} is undefined: {reason}"));
    }

    let output = AppraisalOutput {
        cash_flows,
        metrics,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Steady-state cash-flow projection (flat tax, no depreciation) with NPV, IRR, PP and DPP",
        input,
        warnings,
        elapsed,
        output,
    ))
}
