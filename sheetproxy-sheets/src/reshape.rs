//! Reshaping raw sheet values into JSON.

use serde_json::{Map, Value};

use sheetproxy_core::types::{FormatMapping, ValueRange};

/// Turns a header row plus data rows into an array of objects.
///
/// Each header cell is renamed through `format` (unmapped headers keep their
/// text). Cells missing at the end of a row come out as `null`.
pub fn rows_to_objects(values: &ValueRange, format: &FormatMapping) -> Vec<Value> {
    let Some(header) = values.header() else {
        return Vec::new();
    };

    let keys: Vec<String> = header
        .iter()
        .map(|cell| {
            let label = cell_text(cell);
            format
                .output_key_for(&label)
                .map(str::to_string)
                .unwrap_or(label)
        })
        .collect();

    values
        .body()
        .iter()
        .map(|row| {
            let object: Map<String, Value> = keys
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), row.get(i).cloned().unwrap_or(Value::Null)))
                .collect();
            Value::Object(object)
        })
        .collect()
}

/// Collects label/value rows into one object.
///
/// A row whose first cell equals a mapping's label contributes its second
/// cell under the mapping's output key. Later rows overwrite earlier ones;
/// labels that never appear produce no key.
pub fn labelled_object(values: &ValueRange, format: &FormatMapping) -> Value {
    let mut object = Map::new();

    for row in &values.values {
        let Some(first) = row.first() else {
            continue;
        };
        let label = cell_text(first);
        for field in format.iter().filter(|f| f.label == label) {
            let value = row.get(1).cloned().unwrap_or(Value::Null);
            object.insert(field.output_key.clone(), value);
        }
    }

    Value::Object(object)
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
