use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use appraisal_core::appraisal;
use appraisal_core::metrics::evaluator::{self, FinancialMetrics};
use appraisal_core::projection::cash_flow;
use appraisal_core::projection::parameters::ProjectParameters;
use appraisal_core::types::with_metadata;

use crate::input;

/// Project parameters, from a JSON file, piped JSON, or individual flags
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PlanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total upfront investment
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Project life in years
    #[arg(long)]
    pub life_years: Option<u32>,

    /// Revenue in every operating year
    #[arg(long)]
    pub annual_revenue: Option<Decimal>,

    /// Operating cost in every operating year
    #[arg(long)]
    pub annual_cost: Option<Decimal>,

    /// Flat corporate tax rate (e.g. 0.20 for 20%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Discount rate / WACC (e.g. 0.13 for 13%)
    #[arg(long, alias = "wacc")]
    pub discount_rate: Option<Decimal>,
}

/// Arguments for the cash-flow projection
#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Arguments for a full appraisal
#[derive(Args)]
pub struct AppraiseArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Arguments for evaluating an explicit cash-flow series
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EvaluateArgs {
    /// Comma-separated net cash flows, year 0 first (e.g. "-1000,240,240")
    #[arg(long, value_delimiter = ',')]
    pub cash_flows: Vec<Decimal>,

    /// Discount rate / WACC
    #[arg(long, alias = "wacc")]
    pub discount_rate: Option<Decimal>,

    /// Path to JSON input file with `cash_flows` and `discount_rate`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EvaluateRequest {
    cash_flows: Vec<Decimal>,
    #[serde(alias = "wacc")]
    discount_rate: Decimal,
}

/// Build validated parameters from whichever source the user supplied.
pub fn resolve_parameters(args: &PlanArgs) -> Result<ProjectParameters, Box<dyn std::error::Error>> {
    let value: Value = if let Some(ref path) = args.input {
        log::debug!("reading project parameters from {path}");
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        log::debug!("reading project parameters from stdin");
        data
    } else {
        log::debug!("building project parameters from flags");
        let params = ProjectParameters {
            investment: args
                .investment
                .ok_or("--investment is required (or provide --input)")?,
            life_years: args
                .life_years
                .ok_or("--life-years is required (or provide --input)")?,
            annual_revenue: args
                .annual_revenue
                .ok_or("--annual-revenue is required (or provide --input)")?,
            annual_cost: args
                .annual_cost
                .ok_or("--annual-cost is required (or provide --input)")?,
            tax_rate: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
            discount_rate: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
        };
        serde_json::to_value(params)?
    };

    Ok(ProjectParameters::from_value(&value)?)
}

pub fn log_undefined_metrics(metrics: &FinancialMetrics) {
    for (name, reason) in metrics.undefined_metrics() {
        log::warn!("{name} is undefined: {reason}");
    }
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let params = resolve_parameters(&args.plan)?;

    let series = cash_flow::project(&params)?;
    log::info!("projected {} years of cash flow", series.len());

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Steady-state cash-flow projection (flat tax, no depreciation)",
        &params,
        Vec::new(),
        elapsed,
        series,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request: EvaluateRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        if args.cash_flows.is_empty() {
            return Err("--cash-flows is required (or provide --input)".into());
        }
        EvaluateRequest {
            cash_flows: args.cash_flows.clone(),
            discount_rate: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
        }
    };

    let metrics = evaluator::evaluate_flows(&request.cash_flows, request.discount_rate);
    log_undefined_metrics(&metrics);
    let warnings = metrics
        .undefined_metrics()
        .into_iter()
        .map(|(name, reason)| format!("{name} is undefined: {reason}"))
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "NPV, IRR (bracketed bisection), PP and DPP",
        &request,
        warnings,
        elapsed,
        metrics,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_appraise(args: AppraiseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_parameters(&args.plan)?;
    let result = appraisal::appraise(&params)?;
    log_undefined_metrics(&result.result.metrics);
    log::info!(
        "appraised {}-year plan at discount rate {}",
        params.life_years,
        params.discount_rate
    );
    Ok(serde_json::to_value(result)?)
}
