use appraisal_core::appraisal::appraise;
use appraisal_core::metrics::evaluator::{evaluate, evaluate_flows, MetricValue};
use appraisal_core::metrics::payback::Payback;
use appraisal_core::projection::cash_flow::project;
use appraisal_core::projection::parameters::ProjectParameters;
use appraisal_core::time_value;
use appraisal_core::AppraisalError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_plan() -> ProjectParameters {
    ProjectParameters {
        investment: dec!(1000),
        life_years: 5,
        annual_revenue: dec!(500),
        annual_cost: dec!(200),
        tax_rate: dec!(0.2),
        discount_rate: dec!(0.1),
    }
}

fn plans() -> Vec<ProjectParameters> {
    vec![
        reference_plan(),
        ProjectParameters {
            investment: dec!(30000000000),
            life_years: 10,
            annual_revenue: dec!(9500000000),
            annual_cost: dec!(4000000000),
            tax_rate: dec!(0.2),
            discount_rate: dec!(0.13),
        },
        ProjectParameters {
            investment: dec!(250000),
            life_years: 3,
            annual_revenue: dec!(180000),
            annual_cost: dec!(40000),
            tax_rate: dec!(0),
            discount_rate: dec!(0.07),
        },
        ProjectParameters {
            investment: dec!(75.5),
            life_years: 20,
            annual_revenue: dec!(12.25),
            annual_cost: dec!(3.1),
            tax_rate: dec!(0.35),
            discount_rate: dec!(0.045),
        },
    ]
}

// ===========================================================================
// Projection
// ===========================================================================

#[test]
fn test_projection_shape_for_all_plans() {
    for plan in plans() {
        let series = project(&plan).unwrap();
        assert_eq!(series.len(), plan.life_years as usize + 1);
        assert_eq!(series.rows()[0].net_cash_flow, -plan.investment);

        let operating = &series.rows()[1..];
        assert!(operating.windows(2).all(|w| {
            w[0].revenue == w[1].revenue
                && w[0].cost == w[1].cost
                && w[0].ebt == w[1].ebt
                && w[0].tax == w[1].tax
                && w[0].pat == w[1].pat
                && w[0].net_cash_flow == w[1].net_cash_flow
        }));
    }
}

#[test]
fn test_projection_rejects_missing_life() {
    let mut plan = reference_plan();
    plan.life_years = 0;
    assert!(matches!(
        project(&plan),
        Err(AppraisalError::InvalidParameter { .. })
    ));
}

// ===========================================================================
// Metrics
// ===========================================================================

#[test]
fn test_reference_example() {
    let series = project(&reference_plan()).unwrap();
    assert_eq!(
        series.net_cash_flows(),
        vec![dec!(-1000), dec!(240), dec!(240), dec!(240), dec!(240), dec!(240)]
    );

    let metrics = evaluate(&series, dec!(0.1));
    let npv = *metrics.npv.value().unwrap();
    assert!((npv - dec!(-90.2)).abs() < dec!(0.05), "Expected NPV ~-90.2, got {npv}");

    let pp = metrics.payback_period.value().unwrap().years().unwrap();
    assert!(pp > dec!(4) && pp < dec!(5), "Expected PP in year 5, got {pp}");
    assert!((pp - dec!(4.17)).abs() < dec!(0.01));
}

#[test]
fn test_npv_at_zero_rate_equals_sum() {
    for plan in plans() {
        let series = project(&plan).unwrap();
        let metrics = evaluate(&series, Decimal::ZERO);
        assert_eq!(metrics.npv.value(), Some(&series.total_net_cash_flow()));
    }
}

#[test]
fn test_irr_round_trip() {
    for plan in plans() {
        let series = project(&plan).unwrap();
        let metrics = evaluate(&series, plan.discount_rate);
        let irr_pct = match &metrics.irr {
            MetricValue::Defined { value } => *value,
            MetricValue::Undefined { reason } => panic!("IRR undefined: {reason}"),
        };
        let flows = series.net_cash_flows();
        let npv_at_irr = time_value::npv(irr_pct / dec!(100), &flows).unwrap();
        let tolerance = plan.investment * dec!(0.000001);
        assert!(
            npv_at_irr.abs() < tolerance,
            "NPV at IRR {irr_pct}% should be ~0, got {npv_at_irr}"
        );
    }
}

#[test]
fn test_discounted_payback_not_before_simple_payback() {
    let flows = vec![dec!(-1000), dec!(450), dec!(450), dec!(450), dec!(450), dec!(450)];
    let simple = evaluate_flows(&flows, dec!(0.0))
        .payback_period
        .value()
        .unwrap()
        .years()
        .unwrap();

    for rate in [dec!(0.01), dec!(0.05), dec!(0.1), dec!(0.2), dec!(0.3)] {
        let metrics = evaluate_flows(&flows, rate);
        match metrics.discounted_payback_period.value().unwrap() {
            Payback::Recovered(dpp) => {
                assert!(*dpp >= simple, "DPP {dpp} < PP {simple} at rate {rate}")
            }
            Payback::NeverRecovers => {}
        }
    }
}

#[test]
fn test_discounted_payback_grows_with_rate() {
    let flows = vec![dec!(-1000), dec!(450), dec!(450), dec!(450), dec!(450), dec!(450)];
    let dpp = |rate| {
        evaluate_flows(&flows, rate)
            .discounted_payback_period
            .value()
            .and_then(|p| p.years())
            .unwrap()
    };
    assert!(dpp(dec!(0.05)) < dpp(dec!(0.10)));
    assert!(dpp(dec!(0.10)) < dpp(dec!(0.15)));
}

#[test]
fn test_evaluate_bit_identical() {
    let series = project(&plans()[1]).unwrap();
    let a = evaluate(&series, dec!(0.13));
    let b = evaluate(&series, dec!(0.13));
    assert_eq!(a, b);
}

#[test]
fn test_never_recovering_plan() {
    let mut plan = reference_plan();
    plan.annual_revenue = dec!(210);
    let series = project(&plan).unwrap();
    // pat = 8 per year, never repays 1000
    let metrics = evaluate(&series, dec!(0.1));
    assert_eq!(metrics.payback_period.value(), Some(&Payback::NeverRecovers));
    assert_eq!(
        metrics.discounted_payback_period.value(),
        Some(&Payback::NeverRecovers)
    );
    // a root still exists (deeply negative IRR)
    assert!(metrics.irr.value().unwrap() < &dec!(0));
}

#[test]
fn test_conventional_series_yields_irr() {
    let metrics = evaluate_flows(&[dec!(-1000), dec!(600), dec!(600)], dec!(0.1));
    let irr = *metrics.irr.value().unwrap();
    // 1000 = 600/(1+r) + 600/(1+r)^2  =>  r ≈ 13.07%
    assert!((irr - dec!(13.07)).abs() < dec!(0.01), "got {irr}");
}

#[test]
fn test_negative_discount_rate_is_evaluated() {
    let series = project(&reference_plan()).unwrap();
    let metrics = evaluate(&series, dec!(-0.05));
    assert!(metrics.npv.value().unwrap() > &series.total_net_cash_flow());
}

#[test]
fn test_long_life_plan_at_ordinary_rate() {
    let mut plan = reference_plan();
    plan.life_years = 700;
    let series = project(&plan).unwrap();
    let metrics = evaluate(&series, dec!(0.13));

    // 240 a year is worth ~240 / 0.13 over a long life
    let npv = *metrics.npv.value().unwrap();
    assert!((npv - dec!(846.15)).abs() < dec!(0.01), "got {npv}");

    let dpp = metrics
        .discounted_payback_period
        .value()
        .and_then(Payback::years)
        .unwrap();
    assert!(dpp > dec!(6) && dpp < dec!(7), "got {dpp}");
    assert!(metrics.undefined_metrics().is_empty());
}

// ===========================================================================
// Full appraisal
// ===========================================================================

#[test]
fn test_appraise_json_round_trip() {
    let output = appraise(&plans()[1]).unwrap();
    let json = serde_json::to_string(&output.result).unwrap();
    let back: appraisal_core::appraisal::AppraisalOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(back, output.result);
    assert_eq!(output.metadata.precision, "rust_decimal_128bit");
}
