use crate::metrics::evaluator::{FinancialMetrics, MetricValue};
use crate::metrics::payback::Payback;

/// Keys the extraction reply must contain, with their meaning.
pub const EXTRACTION_KEYS: [(&str, &str); 6] = [
    ("von_dau_tu", "Total investment capital (number only)"),
    ("vong_doi", "Project life in years (number only)"),
    ("doanh_thu_nam", "Annual revenue (number only)"),
    ("chi_phi_nam", "Annual operating cost (number only)"),
    (
        "wacc",
        "Weighted average cost of capital as a decimal (13% is 0.13)",
    ),
    (
        "thue_suat",
        "Corporate income tax rate as a decimal (20% is 0.20)",
    ),
];

/// Instruction text asking the document-understanding service to pull the
/// six appraisal parameters out of a business plan.
pub fn extraction_prompt(document_text: &str) -> String {
    let mut prompt = String::from(
        "You are a financial analyst. Read the business plan below and extract \
         the following values as a JSON object.\n\
         Return only the JSON object, with no explanation.\n\
         Keys to extract:\n",
    );
    for (key, meaning) in EXTRACTION_KEYS {
        prompt.push_str(&format!("- \"{key}\": {meaning}.\n"));
    }
    prompt.push_str("\nBusiness plan:\n---\n");
    prompt.push_str(document_text.trim());
    prompt.push_str("\n---\n");
    prompt
}

/// Instruction text asking for a short written assessment of computed metrics.
///
/// Undefined metrics are stated as such together with their reason.
pub fn analysis_prompt(metrics: &FinancialMetrics) -> String {
    let npv = describe(&metrics.npv, |v| format!("{}", v.round_dp(0)));
    let irr = describe(&metrics.irr, |v| format!("{}%", v.round_dp(2)));
    let pp = describe(&metrics.payback_period, describe_payback);
    let dpp = describe(&metrics.discounted_payback_period, describe_payback);

    format!(
        "You are an investment appraisal expert. Based on the project metrics below, \
         write a short professional analysis of three to four paragraphs.\n\
         \n\
         Metrics:\n\
         - NPV (discount rate {rate}): {npv}\n\
         - IRR: {irr}\n\
         - Payback period (PP): {pp}\n\
         - Discounted payback period (DPP): {dpp}\n\
         \n\
         The analysis must:\n\
         1. Explain what each metric means for this project.\n\
         2. Assess the feasibility and attractiveness of the project.\n\
         3. End with one conclusion: \"The project is financially viable\" or \
         \"The project is not financially viable\".\n",
        rate = metrics.discount_rate,
    )
}

fn describe<T>(metric: &MetricValue<T>, render: impl Fn(&T) -> String) -> String {
    match metric {
        MetricValue::Defined { value } => render(value),
        MetricValue::Undefined { reason } => format!("undefined ({reason})"),
    }
}

fn describe_payback(payback: &Payback) -> String {
    match payback {
        Payback::Recovered(years) => format!("{} years", years.round_dp(2)),
        Payback::NeverRecovers => "not recovered within the project life".to_string(),
    }
}
