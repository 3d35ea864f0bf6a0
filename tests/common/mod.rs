pub mod fixtures;

use jstream::{JsonStream, StreamError};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Applies a chain of operations to a copy of `document` and returns the result.
pub fn transform(document: &Value, operations: &[&str]) -> Result<Value, StreamError> {
    Ok(JsonStream::of(document.clone())
        .apply_all(operations)?
        .into_value())
}

/// Collects the string field `key` from every element of an array document.
pub fn field_values(document: &Value, key: &str) -> Vec<String> {
    document
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(key).and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
