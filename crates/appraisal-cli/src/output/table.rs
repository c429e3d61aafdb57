use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{metric_display, plain_value};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_section(result);
                print_envelope_notes(map);
            } else {
                print_section(value);
            }
        }
        Value::String(s) => println!("{}", s),
        _ => print_section(value),
    }
}

/// Scalars and metrics go into one Field/Value table; row lists and nested
/// objects get their own titled table.
fn print_section(value: &Value) {
    match value {
        Value::Array(arr) => print_array_table(arr),
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            let mut has_rows = false;
            let mut nested: Vec<(&String, &Value)> = Vec::new();

            for (key, val) in map {
                let is_row_list = matches!(val, Value::Array(items)
                    if !items.is_empty() && items.iter().all(Value::is_object));
                let is_plain_object = val.is_object() && metric_display(val).is_none();

                if is_row_list || is_plain_object {
                    nested.push((key, val));
                } else {
                    builder.push_record([key.as_str(), &plain_value(val)]);
                    has_rows = true;
                }
            }

            if has_rows {
                println!("{}", Table::from(builder));
            }
            for (key, val) in nested {
                println!("\n{}:", key);
                print_section(val);
            }
        }
        _ => println!("{}", plain_value(value)),
    }
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }

    if let Some(Value::String(prompt)) = envelope.get("analysis_prompt") {
        println!("\nAnalysis prompt:\n{}", prompt);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(plain_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", plain_value(item));
        }
    }
}
