use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use appraisal_core::sensitivity::npv_grid::{self, NpvSensitivityInput};
use appraisal_core::types::Sweep;

use super::appraisal::{resolve_parameters, PlanArgs};

/// Arguments for the NPV sensitivity grid
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Discount-rate sweep as min:max:step (e.g. "0.06:0.16:0.02")
    #[arg(long)]
    pub rates: Option<String>,

    /// Revenue-change sweep as min:max:step (e.g. "-0.2:0.2:0.1")
    #[arg(long)]
    pub revenue_changes: Option<String>,
}

fn parse_sweep(text: &str) -> Result<Sweep, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Sweep must be min:max:step, got '{}'", text).into());
    }
    Ok(Sweep {
        min: parts[0].trim().parse()?,
        max: parts[1].trim().parse()?,
        step: parts[2].trim().parse()?,
    })
}

/// Default rate sweep: the plan's own rate +/- 4 points in 2-point steps.
fn default_rate_sweep(base: Decimal) -> Sweep {
    Sweep {
        min: base.saturating_sub(dec!(0.04)),
        max: base.saturating_add(dec!(0.04)),
        step: dec!(0.02),
    }
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let parameters = resolve_parameters(&args.plan)?;

    let discount_rates = match args.rates.as_deref() {
        Some(text) => parse_sweep(text)?,
        None => default_rate_sweep(parameters.discount_rate),
    };
    let revenue_changes = match args.revenue_changes.as_deref() {
        Some(text) => parse_sweep(text)?,
        None => Sweep {
            min: dec!(-0.2),
            max: dec!(0.2),
            step: dec!(0.1),
        },
    };

    let input = NpvSensitivityInput {
        parameters,
        discount_rates,
        revenue_changes,
    };
    let result = npv_grid::npv_sensitivity(&input)?;
    for w in &result.warnings {
        log::warn!("{w}");
    }
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sweep() {
        let sweep = parse_sweep("-0.2:0.2:0.1").unwrap();
        assert_eq!(sweep.min, dec!(-0.2));
        assert_eq!(sweep.max, dec!(0.2));
        assert_eq!(sweep.step, dec!(0.1));
    }

    #[test]
    fn test_parse_sweep_rejects_bad_shape() {
        assert!(parse_sweep("0.1:0.2").is_err());
        assert!(parse_sweep("a:b:c").is_err());
    }

    #[test]
    fn test_default_rate_sweep_centres_on_base() {
        let sweep = default_rate_sweep(dec!(0.13));
        assert_eq!(sweep.min, dec!(0.09));
        assert_eq!(sweep.max, dec!(0.17));
    }
}
