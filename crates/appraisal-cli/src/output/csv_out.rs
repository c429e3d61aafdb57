use serde_json::Value;
use std::io;

use super::{metric_display, plain_value};

/// Write output as CSV to stdout.
///
/// A row list (the cash-flow table) becomes one record per row; anything else
/// is flattened into `field,value` records with dotted paths.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record(["field", "value"]);
            let mut records = Vec::new();
            flatten("", result, &mut records);
            for (field, val) in records {
                let _ = wtr.write_record([field.as_str(), val.as_str()]);
            }
        }
    }

    let _ = wtr.flush();
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };

    if let Some(display) = metric_display(value) {
        out.push((prefix.to_string(), display));
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(key), val, out);
            }
        }
        Value::Array(arr) if arr.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, val) in arr.iter().enumerate() {
                flatten(&join(&i.to_string()), val, out);
            }
        }
        _ => out.push((prefix.to_string(), format_csv_value(value))),
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        _ => plain_value(value),
    }
}
