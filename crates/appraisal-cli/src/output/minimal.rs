use serde_json::Value;

use super::{metric_display, plain_value};

/// Priority list of key output fields
const PRIORITY_KEYS: [&str; 5] = [
    "npv",
    "irr",
    "payback_period",
    "discounted_payback_period",
    "base_case_npv",
];

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority (inside
/// `metrics` when present), then fall back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let metrics_obj = result_obj.get("metrics").unwrap_or(result_obj);

    match metrics_obj {
        Value::Object(map) => {
            // Try priority keys first (skip null values)
            for key in &PRIORITY_KEYS {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        return metric_display(val).unwrap_or_else(|| plain_value(val));
                    }
                }
            }

            // Fall back to first field
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, plain_value(val)),
                None => String::new(),
            }
        }
        // A cash-flow table reduces to its net cash flows
        Value::Array(rows) if rows.iter().all(|r| r.get("net_cash_flow").is_some()) => rows
            .iter()
            .filter_map(|r| r.get("net_cash_flow").map(plain_value))
            .collect::<Vec<_>>()
            .join(","),
        _ => plain_value(metrics_obj),
    }
}
