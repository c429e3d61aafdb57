use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::projection::cash_flow::CashFlowSeries;
use crate::time_value;
use crate::types::{Money, Rate};
use crate::AppraisalResult;

use super::payback::{discounted_payback_period, payback_period, Payback};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Outcome of a single metric. A metric that cannot be computed is reported
/// as undefined with the reason; it never falls back to a numeric default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricValue<T> {
    Defined { value: T },
    Undefined { reason: String },
}

impl<T> MetricValue<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            MetricValue::Defined { value } => Some(value),
            MetricValue::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Defined { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            MetricValue::Defined { .. } => None,
            MetricValue::Undefined { reason } => Some(reason),
        }
    }
}

impl<T> From<AppraisalResult<T>> for MetricValue<T> {
    fn from(result: AppraisalResult<T>) -> Self {
        match result {
            Ok(value) => MetricValue::Defined { value },
            Err(e) => MetricValue::Undefined {
                reason: e.to_string(),
            },
        }
    }
}

/// Investment-appraisal metrics of a cash-flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// Net present value at `discount_rate`
    pub npv: MetricValue<Money>,
    /// Internal rate of return, as a percentage (9.7 = 9.7%)
    pub irr: MetricValue<Rate>,
    /// Simple payback period in years
    pub payback_period: MetricValue<Payback>,
    /// Payback period over the discounted series
    pub discounted_payback_period: MetricValue<Payback>,
    /// Discount rate the metrics were evaluated at
    pub discount_rate: Rate,
}

impl FinancialMetrics {
    /// Names and reasons of the metrics that could not be computed.
    pub fn undefined_metrics(&self) -> Vec<(&'static str, &str)> {
        [
            ("npv", self.npv.reason()),
            ("irr", self.irr.reason()),
            ("payback_period", self.payback_period.reason()),
            (
                "discounted_payback_period",
                self.discounted_payback_period.reason(),
            ),
        ]
        .into_iter()
        .filter_map(|(name, reason)| reason.map(|r| (name, r)))
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate NPV, IRR, payback and discounted payback for a projected series.
pub fn evaluate(series: &CashFlowSeries, discount_rate: Rate) -> FinancialMetrics {
    evaluate_flows(&series.net_cash_flows(), discount_rate)
}

/// Evaluate the metrics for a bare net-cash-flow series (year 0 first).
///
/// Each metric is computed on its own; a failure in one leaves the others
/// untouched.
pub fn evaluate_flows(cash_flows: &[Money], discount_rate: Rate) -> FinancialMetrics {
    FinancialMetrics {
        npv: time_value::npv(discount_rate, cash_flows).into(),
        irr: time_value::irr(cash_flows)
            .map(|rate| rate * dec!(100))
            .into(),
        payback_period: payback_period(cash_flows).into(),
        discounted_payback_period: discounted_payback_period(discount_rate, cash_flows).into(),
        discount_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn reference_flows() -> Vec<Money> {
        vec![
            dec!(-1000),
            dec!(240),
            dec!(240),
            dec!(240),
            dec!(240),
            dec!(240),
        ]
    }

    #[test]
    fn test_reference_metrics() {
        let m = evaluate_flows(&reference_flows(), dec!(0.1));

        let npv = *m.npv.value().unwrap();
        assert!((npv - dec!(-90.21)).abs() < dec!(0.01), "got {npv}");

        let irr = *m.irr.value().unwrap();
        assert!(irr > dec!(6) && irr < dec!(7), "got {irr}");

        let pp = m.payback_period.value().unwrap().years().unwrap();
        assert!((pp - dec!(4.1667)).abs() < dec!(0.0001));

        assert_eq!(
            m.discounted_payback_period.value(),
            Some(&Payback::NeverRecovers)
        );
        assert!(m.undefined_metrics().is_empty());
    }

    #[test]
    fn test_irr_failure_does_not_block_other_metrics() {
        let flows = vec![dec!(-1000), dec!(-50), dec!(-50)];
        let m = evaluate_flows(&flows, dec!(0.1));

        assert!(!m.irr.is_defined());
        assert!(m.npv.is_defined());
        assert_eq!(m.payback_period.value(), Some(&Payback::NeverRecovers));
        assert!(m.discounted_payback_period.is_defined());

        let undefined = m.undefined_metrics();
        assert_eq!(undefined.len(), 1);
        assert_eq!(undefined[0].0, "irr");
    }

    #[test]
    fn test_invalid_rate_leaves_rate_free_metrics() {
        let m = evaluate_flows(&reference_flows(), dec!(-1));

        assert!(!m.npv.is_defined());
        assert!(!m.discounted_payback_period.is_defined());
        assert!(m.irr.is_defined());
        assert!(m.payback_period.is_defined());
        assert!(m.npv.reason().unwrap().contains("-100%"));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let a = evaluate_flows(&reference_flows(), dec!(0.0825));
        let b = evaluate_flows(&reference_flows(), dec!(0.0825));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_npv_zero_rate_is_plain_sum() {
        let m = evaluate_flows(&reference_flows(), Decimal::ZERO);
        let sum: Money = reference_flows().iter().sum();
        assert_eq!(m.npv.value(), Some(&sum));
    }

    #[test]
    fn test_metric_value_serialization() {
        let defined: MetricValue<Money> = MetricValue::Defined { value: dec!(1.5) };
        assert_eq!(
            serde_json::to_value(&defined).unwrap(),
            serde_json::json!({ "status": "defined", "value": "1.5" })
        );

        let undefined: MetricValue<Money> = MetricValue::Undefined {
            reason: "no root".into(),
        };
        let json = serde_json::to_value(&undefined).unwrap();
        assert_eq!(json["status"], "undefined");
        let back: MetricValue<Money> = serde_json::from_value(json).unwrap();
        assert_eq!(back, undefined);
    }
}
