pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Collapse a serialized metric (`{"status": "defined", "value": ...}`) into
/// display text. Returns None for anything that is not a metric.
pub fn metric_display(value: &Value) -> Option<String> {
    match value.get("status")?.as_str()? {
        "defined" => Some(plain_value(value.get("value")?)),
        "undefined" => Some(format!(
            "undefined ({})",
            value
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given")
        )),
        _ => None,
    }
}

/// Text for a scalar-like value, unwrapping payback periods.
pub fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) if s == "never_recovers" => "never recovers".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(map) => match map.get("recovered") {
            Some(years) if map.len() == 1 => plain_value(years),
            _ => metric_display(value)
                .unwrap_or_else(|| serde_json::to_string(value).unwrap_or_default()),
        },
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(plain_value).collect();
            items.join(", ")
        }
    }
}
