use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use appraisal_core::projection::parameters::ProjectParameters;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parameters accept both typed JSON and the loosely-typed extraction shape.
fn parse_parameters(input_json: &str) -> NapiResult<ProjectParameters> {
    let value: serde_json::Value = serde_json::from_str(input_json).map_err(to_napi_error)?;
    ProjectParameters::from_value(&value).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct EvaluateRequest {
    cash_flows: Vec<rust_decimal::Decimal>,
    #[serde(alias = "wacc")]
    discount_rate: rust_decimal::Decimal,
}

// ---------------------------------------------------------------------------
// Projection & metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flows(input_json: String) -> NapiResult<String> {
    let params = parse_parameters(&input_json)?;
    let series =
        appraisal_core::projection::cash_flow::project(&params).map_err(to_napi_error)?;
    serde_json::to_string(&series).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_metrics(input_json: String) -> NapiResult<String> {
    let request: EvaluateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let metrics = appraisal_core::metrics::evaluator::evaluate_flows(
        &request.cash_flows,
        request.discount_rate,
    );
    serde_json::to_string(&metrics).map_err(to_napi_error)
}

#[napi]
pub fn appraise_project(input_json: String) -> NapiResult<String> {
    let params = parse_parameters(&input_json)?;
    let output = appraisal_core::appraisal::appraise(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[napi]
pub fn decode_extraction_reply(reply_text: String) -> NapiResult<String> {
    let params = appraisal_core::extraction::reply::parse_extraction_reply(&reply_text)
        .map_err(to_napi_error)?;
    serde_json::to_string(&params).map_err(to_napi_error)
}

#[napi]
pub fn extraction_prompt(document_text: String) -> String {
    appraisal_core::extraction::prompt::extraction_prompt(&document_text)
}

#[napi]
pub fn analysis_prompt(metrics_json: String) -> NapiResult<String> {
    let metrics: appraisal_core::metrics::evaluator::FinancialMetrics =
        serde_json::from_str(&metrics_json).map_err(to_napi_error)?;
    Ok(appraisal_core::extraction::prompt::analysis_prompt(&metrics))
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn npv_sensitivity(input_json: String) -> NapiResult<String> {
    let input: appraisal_core::sensitivity::npv_grid::NpvSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        appraisal_core::sensitivity::npv_grid::npv_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
