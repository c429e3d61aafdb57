#![cfg(feature = "extraction")]

use appraisal_core::appraisal::appraise;
use appraisal_core::extraction::prompt::{analysis_prompt, extraction_prompt};
use appraisal_core::extraction::reply::parse_extraction_reply;
use appraisal_core::AppraisalError;
use rust_decimal_macros::dec;

const FENCED_REPLY: &str = "```json\n{\n  \"von_dau_tu\": \"1000\",\n  \"vong_doi\": 5,\n  \"doanh_thu_nam\": 500,\n  \"chi_phi_nam\": 200,\n  \"wacc\": 0.1,\n  \"thue_suat\": 0.2\n}\n```";

#[test]
fn test_reply_to_appraisal_pipeline() {
    let params = parse_extraction_reply(FENCED_REPLY).unwrap();
    let output = appraise(&params).unwrap();
    let metrics = &output.result.metrics;

    let npv = *metrics.npv.value().unwrap();
    assert!((npv - dec!(-90.21)).abs() < dec!(0.01), "got {npv}");

    let prompt = analysis_prompt(metrics);
    assert!(prompt.contains("NPV (discount rate 0.1): -90"));
    assert!(prompt.contains("Discounted payback period (DPP): not recovered"));
}

#[test]
fn test_reply_with_invalid_tax_rate() {
    let reply = r#"{"von_dau_tu": 1000, "vong_doi": 5, "doanh_thu_nam": 500,
                    "chi_phi_nam": 200, "wacc": 0.1, "thue_suat": 20}"#;
    match parse_extraction_reply(reply) {
        Err(AppraisalError::InvalidParameter { field, .. }) => assert_eq!(field, "tax_rate"),
        other => panic!("Expected InvalidParameter, got: {other:?}"),
    }
}

#[test]
fn test_prompt_embeds_document() {
    let prompt = extraction_prompt("Investment: 30 billion VND over 10 years.");
    assert!(prompt.contains("Investment: 30 billion VND over 10 years."));
    assert!(prompt.contains("Return only the JSON object"));
}
