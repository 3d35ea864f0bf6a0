use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Malformed operation: {0}")]
    MalformedOperation(String),

    #[error("Parse error in '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("'{operation}' expected array, found {found}")]
    StructuralMismatch {
        operation: &'static str,
        found: &'static str,
    },

    #[error("Non-finite number {value} cannot be stored in field '{field}'")]
    NonFiniteNumber { field: String, value: f64 },
}

impl QueryError {
    pub(crate) fn parse(input: &str, message: impl Into<String>) -> Self {
        QueryError::Parse {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

/// A short name for the JSON type of a node, used in error messages.
pub(crate) fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
