use serde_json::Value;

use crate::error::AppraisalError;
use crate::projection::parameters::ProjectParameters;
use crate::AppraisalResult;

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````) from a
/// model reply. Text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) on the opening line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Decode the extraction reply into validated project parameters.
///
/// When the reply contains prose around the JSON, the outermost `{ ... }`
/// block is used.
pub fn parse_extraction_reply(text: &str) -> AppraisalResult<ProjectParameters> {
    let body = strip_code_fences(text);
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(first_err) => {
            let object = outer_object(body).ok_or_else(|| {
                AppraisalError::SerializationError(format!(
                    "Extraction reply is not JSON: {first_err}"
                ))
            })?;
            serde_json::from_str(object)?
        }
    };
    ProjectParameters::from_value(&value)
}

fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
