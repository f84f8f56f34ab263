// api-factory/src/query.rs
use crate::data::Data;
use crate::encode::{encode_component, number_text};
use serde_json::Value;

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        // null and nested structures have no query representation
        _ => String::new(),
    }
}

/// Serialize the defined fields as `key=value` pairs joined by `&`.
///
/// Arrays repeat the key once per element.
pub fn stringify(data: &Data) -> String {
    let mut pairs = Vec::new();
    for (name, value) in data.iter() {
        let key = encode_component(name);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}={}", key, encode_component(&scalar_text(item))));
                }
            }
            other => pairs.push(format!("{}={}", key, encode_component(&scalar_text(other)))),
        }
    }
    pairs.join("&")
}

/// Append a query string, continuing an existing one if present
pub fn append(url: &mut String, query: &str) {
    if query.is_empty() {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(query);
}
