use clap::Args;
use serde_json::{json, Value};

use appraisal_core::appraisal;
use appraisal_core::extraction::prompt::{analysis_prompt, extraction_prompt};
use appraisal_core::extraction::reply::parse_extraction_reply;

use crate::commands::appraisal::log_undefined_metrics;
use crate::input;

/// Arguments for decoding an extraction reply
#[derive(Args)]
pub struct ExtractArgs {
    /// Path to the raw reply text of the document-understanding service
    /// (reads stdin when omitted)
    #[arg(long)]
    pub reply: Option<String>,

    /// Continue into a full appraisal of the decoded parameters
    #[arg(long)]
    pub appraise: bool,

    /// With --appraise, include the commentary prompt for the computed metrics
    #[arg(long, requires = "appraise")]
    pub with_analysis_prompt: bool,
}

/// Arguments for building the extraction prompt
#[derive(Args)]
pub struct PromptArgs {
    /// Path to the plain-text business plan (reads stdin when omitted)
    #[arg(long)]
    pub document: Option<String>,
}

fn read_source(path: Option<&str>, what: &str) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return input::file::read_text(path);
    }
    input::stdin::read_stdin_text()?
        .ok_or_else(|| format!("--{what} is required when nothing is piped on stdin").into())
}

pub fn run_extract(args: ExtractArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let reply = read_source(args.reply.as_deref(), "reply")?;
    let params = parse_extraction_reply(&reply)?;
    log::info!("decoded project parameters from extraction reply");

    if !args.appraise {
        return Ok(json!({ "result": params }));
    }

    let output = appraisal::appraise(&params)?;
    log_undefined_metrics(&output.result.metrics);

    let mut value = serde_json::to_value(&output)?;
    if args.with_analysis_prompt {
        value["analysis_prompt"] = Value::String(analysis_prompt(&output.result.metrics));
    }
    Ok(value)
}

pub fn run_prompt(args: PromptArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document = read_source(args.document.as_deref(), "document")?;
    Ok(Value::String(extraction_prompt(&document)))
}
