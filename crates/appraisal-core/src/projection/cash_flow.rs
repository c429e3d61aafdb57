use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppraisalError;
use crate::types::Money;
use crate::AppraisalResult;

use super::parameters::ProjectParameters;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One year of the projected cash-flow table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRow {
    /// Year index; year 0 carries the investment outlay only
    pub year: u32,
    pub revenue: Money,
    pub cost: Money,
    /// Earnings before tax
    pub ebt: Money,
    pub tax: Money,
    /// Profit after tax
    pub pat: Money,
    pub net_cash_flow: Money,
}

/// Year-ordered cash-flow table, `life_years + 1` rows long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashFlowSeries {
    rows: Vec<CashFlowRow>,
}

impl CashFlowSeries {
    pub fn rows(&self) -> &[CashFlowRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Net cash flow per year, year 0 first.
    pub fn net_cash_flows(&self) -> Vec<Money> {
        self.rows.iter().map(|r| r.net_cash_flow).collect()
    }

    /// Plain sum of all net cash flows.
    pub fn total_net_cash_flow(&self) -> Money {
        self.rows.iter().map(|r| r.net_cash_flow).sum()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the steady-state cash-flow table for a project.
///
/// Every operating year repeats the same computation: `ebt = revenue - cost`,
/// `tax = ebt * tax_rate`, `pat = ebt - tax` and `net_cash_flow = pat`. There
/// is no depreciation add-back and no working-capital movement. A loss-making
/// year produces negative tax (a credit), as the flat-rate model implies.
pub fn project(params: &ProjectParameters) -> AppraisalResult<CashFlowSeries> {
    params.validate()?;

    let ebt = params
        .annual_revenue
        .checked_sub(params.annual_cost)
        .ok_or_else(|| overflow("annual_revenue - annual_cost"))?;
    let tax = ebt
        .checked_mul(params.tax_rate)
        .ok_or_else(|| overflow("ebt * tax_rate"))?;
    let pat = ebt - tax;

    let mut rows = Vec::with_capacity(params.life_years as usize + 1);
    rows.push(CashFlowRow {
        year: 0,
        revenue: Decimal::ZERO,
        cost: Decimal::ZERO,
        ebt: Decimal::ZERO,
        tax: Decimal::ZERO,
        pat: Decimal::ZERO,
        net_cash_flow: -params.investment,
    });

    for year in 1..=params.life_years {
        rows.push(CashFlowRow {
            year,
            revenue: params.annual_revenue,
            cost: params.annual_cost,
            ebt,
            tax,
            pat,
            net_cash_flow: pat,
        });
    }

    Ok(CashFlowSeries { rows })
}

fn overflow(context: &str) -> AppraisalError {
    AppraisalError::NumericOverflow {
        context: context.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample() -> ProjectParameters {
        ProjectParameters {
            investment: dec!(1000),
            life_years: 5,
            annual_revenue: dec!(500),
            annual_cost: dec!(200),
            tax_rate: dec!(0.2),
            discount_rate: dec!(0.1),
        }
    }

    #[test]
    fn test_reference_projection() {
        let series = project(&sample()).unwrap();
        assert_eq!(series.len(), 6);
        assert_eq!(
            series.net_cash_flows(),
            vec![
                dec!(-1000),
                dec!(240),
                dec!(240),
                dec!(240),
                dec!(240),
                dec!(240)
            ]
        );

        let year_one = &series.rows()[1];
        assert_eq!(year_one.ebt, dec!(300));
        assert_eq!(year_one.tax, dec!(60));
        assert_eq!(year_one.pat, dec!(240));
    }

    #[test]
    fn test_year_zero_is_outlay_only() {
        let series = project(&sample()).unwrap();
        let zero = &series.rows()[0];
        assert_eq!(zero.year, 0);
        assert!(zero.revenue.is_zero() && zero.cost.is_zero());
        assert!(zero.ebt.is_zero() && zero.tax.is_zero() && zero.pat.is_zero());
        assert_eq!(zero.net_cash_flow, dec!(-1000));
    }

    #[test]
    fn test_operating_years_identical() {
        let mut params = sample();
        params.life_years = 12;
        params.annual_revenue = dec!(1234.567);
        params.tax_rate = dec!(0.22);

        let series = project(&params).unwrap();
        assert_eq!(series.len(), 13);
        let first = &series.rows()[1];
        for (i, row) in series.rows().iter().enumerate().skip(1) {
            assert_eq!(row.year as usize, i);
            assert_eq!(row.net_cash_flow, first.net_cash_flow);
            assert_eq!(row.ebt, first.ebt);
        }
    }

    #[test]
    fn test_single_year_project() {
        let mut params = sample();
        params.life_years = 1;
        let series = project(&params).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.total_net_cash_flow(), dec!(-760));
    }

    #[test]
    fn test_loss_making_year_gives_tax_credit() {
        let mut params = sample();
        params.annual_revenue = dec!(100);
        let series = project(&params).unwrap();
        let row = &series.rows()[1];
        assert_eq!(row.ebt, dec!(-100));
        assert_eq!(row.tax, dec!(-20));
        assert_eq!(row.net_cash_flow, dec!(-80));
    }

    #[test]
    fn test_invalid_parameters_fail_without_partial_series() {
        let mut params = sample();
        params.life_years = 0;
        match project(&params) {
            Err(AppraisalError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "life_years")
            }
            other => panic!("Expected InvalidParameter, got: {other:?}"),
        }
    }

    #[test]
    fn test_series_serializes_as_array() {
        let series = project(&sample()).unwrap();
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(6));
        let back: CashFlowSeries = serde_json::from_value(value).unwrap();
        assert_eq!(back, series);
    }
}
