use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AppraisalError;
use crate::projection::cash_flow::project;
use crate::projection::parameters::ProjectParameters;
use crate::time_value;
use crate::types::*;
use crate::AppraisalResult;

/// Largest grid evaluated in one call.
pub const MAX_GRID_CELLS: usize = 10_000;

/// Input for a 2-way NPV sensitivity grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpvSensitivityInput {
    /// Base case plan
    pub parameters: ProjectParameters,
    /// Discount rates to sweep (rows)
    pub discount_rates: Sweep,
    /// Relative change applied to annual revenue (columns), e.g. -0.2..0.2
    pub revenue_changes: Sweep,
}

/// Output of a 2-way NPV sensitivity grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpvSensitivityOutput {
    pub discount_rates: Vec<Rate>,
    pub revenue_changes: Vec<Rate>,
    /// matrix[i][j] = NPV at discount_rates[i] with revenue scaled by (1 + revenue_changes[j]);
    /// `None` where the cell could not be evaluated
    pub matrix: Vec<Vec<Option<Money>>>,
    /// NPV of the unchanged plan at its own discount rate
    pub base_case_npv: Option<Money>,
    /// Grid cell closest to the base case (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values from min to max with step; max is always included.
fn generate_sweep_values(field: &str, sweep: &Sweep) -> AppraisalResult<Vec<Decimal>> {
    if sweep.step <= Decimal::ZERO {
        return Err(AppraisalError::invalid(field, "Step must be positive"));
    }
    if sweep.min > sweep.max {
        return Err(AppraisalError::invalid(field, "Min must be <= max"));
    }

    let mut values = Vec::new();
    let mut current = sweep.min;
    while current <= sweep.max {
        values.push(current);
        if values.len() > MAX_GRID_CELLS {
            return Err(AppraisalError::invalid(field, "Sweep has too many steps"));
        }
        current = match current.checked_add(sweep.step) {
            Some(next) => next,
            None => break,
        };
    }
    if let Some(&last) = values.last() {
        if last < sweep.max {
            values.push(sweep.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| v.checked_sub(target).map_or(Decimal::MAX, |d| d.abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn npv_for(params: &ProjectParameters, discount_rate: Rate, revenue_change: Rate) -> AppraisalResult<Money> {
    let annual_revenue = (Decimal::ONE + revenue_change)
        .checked_mul(params.annual_revenue)
        .ok_or_else(|| AppraisalError::NumericOverflow {
            context: format!("annual revenue scaled by {revenue_change}"),
        })?;
    let scaled = ProjectParameters {
        annual_revenue,
        ..params.clone()
    };
    let series = project(&scaled)?;
    time_value::npv(discount_rate, &series.net_cash_flows())
}

/// NPV over a grid of discount rates and revenue changes.
pub fn npv_sensitivity(
    input: &NpvSensitivityInput,
) -> AppraisalResult<ComputationOutput<NpvSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.parameters.validate()?;
    let rates = generate_sweep_values("discount_rates", &input.discount_rates)?;
    let changes = generate_sweep_values("revenue_changes", &input.revenue_changes)?;
    if rates.len() * changes.len() > MAX_GRID_CELLS {
        return Err(AppraisalError::invalid(
            "sensitivity",
            format!(
                "Grid of {}x{} exceeds {MAX_GRID_CELLS} cells",
                rates.len(),
                changes.len()
            ),
        ));
    }

    let mut matrix = Vec::with_capacity(rates.len());
    for rate in &rates {
        let mut row = Vec::with_capacity(changes.len());
        for change in &changes {
            match npv_for(&input.parameters, *rate, *change) {
                Ok(val) => row.push(Some(val)),
                Err(e) => {
                    warnings.push(format!(
                        "Evaluation failed at (rate {rate}, revenue change {change}): {e}"
                    ));
                    row.push(None);
                }
            }
        }
        matrix.push(row);
    }

    let base_case_npv = match npv_for(&input.parameters, input.parameters.discount_rate, Decimal::ZERO) {
        Ok(v) => Some(v),
        Err(e) => {
            warnings.push(format!("Base case NPV is undefined: {e}"));
            None
        }
    };
    let base_case_position = (
        closest_index(&rates, input.parameters.discount_rate),
        closest_index(&changes, Decimal::ZERO),
    );

    let output = NpvSensitivityOutput {
        discount_rates: rates,
        revenue_changes: changes,
        matrix,
        base_case_npv,
        base_case_position,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way NPV Sensitivity (discount rate x revenue change)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
