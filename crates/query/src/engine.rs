//! Applies parsed statements to documents.

use crate::ast::{Program, Statement};
use crate::config::EngineConfig;
use crate::error::QueryError;
use crate::ops;
use crate::parser::parse_operation;
use serde_json::Value;

/// Applies statements to documents in place using a fixed [`EngineConfig`].
///
/// An engine holds no per-document state. It can be shared freely and used
/// on any number of documents, one statement at a time per document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies a single statement. On error the document is unchanged.
    pub fn apply(&self, document: &mut Value, statement: &Statement) -> Result<(), QueryError> {
        log::debug!("Applying '{}' statement", statement.keyword());
        let policy = self.config.non_finite;
        match statement {
            Statement::Filter(predicate) => ops::filter(document, predicate),
            Statement::Map { target, value } => ops::assign(document, target, value, policy),
            Statement::Append { target, value } => ops::append(document, target, value, policy),
            Statement::Rename { target, source } => ops::rename(document, target, source),
        }
    }

    /// Applies statements in order, stopping at the first failure. Statements
    /// that already ran keep their effect.
    pub fn apply_program(&self, document: &mut Value, program: &Program) -> Result<(), QueryError> {
        for (index, statement) in program.statements.iter().enumerate() {
            if let Err(e) = self.apply(document, statement) {
                log::warn!(
                    "Statement {} of {} ('{}') failed: {}",
                    index + 1,
                    program.len(),
                    statement.keyword(),
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Parses and applies one operation, e.g. `map -> total = price * qty`.
    pub fn apply_text(&self, document: &mut Value, operation: &str) -> Result<(), QueryError> {
        let statement = parse_operation(operation)?;
        self.apply(document, &statement)
    }

    /// Parses every operation up front, then applies them in order. A parse
    /// failure anywhere in the chain leaves the document untouched.
    pub fn apply_all<I, S>(&self, document: &mut Value, operations: I) -> Result<(), QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let program = operations
            .into_iter()
            .map(|op| parse_operation(op.as_ref()))
            .collect::<Result<Program, _>>()?;
        self.apply_program(document, &program)
    }
}

/// Parses and applies one operation with the default configuration.
pub fn apply(document: &mut Value, operation: &str) -> Result<(), QueryError> {
    Engine::default().apply_text(document, operation)
}

/// Parses and applies a chain of operations with the default configuration.
pub fn apply_all<I, S>(document: &mut Value, operations: I) -> Result<(), QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Engine::default().apply_all(document, operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NonFiniteNumbers;
    use crate::parser::parse_program;
    use serde_json::json;

    fn people() -> Value {
        json!([
            { "name": "Ali", "family": "Javadi", "age": 45 },
            { "name": "Sara", "family": "Karimi", "age": 21 },
            { "name": "Reza", "family": "Ahmadi", "age": 30 }
        ])
    }

    #[test]
    fn test_apply_single_operation() {
        let mut doc = people();
        apply(&mut doc, "filter -> age >= 30").unwrap();
        assert_eq!(doc.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_chain_runs_in_order() {
        let mut doc = people();
        apply_all(
            &mut doc,
            [
                "map -> full = name || \" \" || family",
                "filter -> full ~ \"java\"",
                "rename -> years = age",
            ],
        )
        .unwrap();
        assert_eq!(
            doc,
            json!([{ "name": "Ali", "family": "Javadi", "years": 45, "full": "Ali Javadi" }])
        );
    }

    #[test]
    fn test_parse_error_in_chain_touches_nothing() {
        let mut doc = people();
        let err = apply_all(&mut doc, ["map -> x = 1", "map -> = 2"]).unwrap_err();
        assert!(matches!(err, QueryError::Parse { .. }));
        assert_eq!(doc, people());
    }

    #[test]
    fn test_runtime_error_keeps_earlier_statements() {
        let mut doc = json!({ "a": 1 });
        let err = apply_all(&mut doc, ["map -> b = 2", "filter -> a == 1", "map -> c = 3"])
            .unwrap_err();
        assert!(matches!(err, QueryError::StructuralMismatch { operation: "filter", .. }));
        assert_eq!(doc, json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_malformed_operation_is_reported() {
        let mut doc = people();
        let err = apply(&mut doc, "sort -> age").unwrap_err();
        assert!(matches!(err, QueryError::MalformedOperation(_)));
        let err = apply(&mut doc, "age > 3").unwrap_err();
        assert!(matches!(err, QueryError::MalformedOperation(_)));
    }

    #[test]
    fn test_configured_policy_reaches_assignments() {
        let engine = Engine::new(EngineConfig::new().with_non_finite(NonFiniteNumbers::Reject));
        let mut doc = people();
        let err = engine.apply_text(&mut doc, "map -> ratio = age / 0").unwrap_err();
        assert!(matches!(err, QueryError::NonFiniteNumber { .. }));
        assert_eq!(doc, people());
    }

    #[test]
    fn test_program_from_one_text() {
        let program = parse_program("map -> a = 1; append -> a = 2 | append -> b = 3").unwrap();
        let mut doc = json!({});
        Engine::default().apply_program(&mut doc, &program).unwrap();
        assert_eq!(doc, json!({ "a": 1, "b": 3 }));
    }
}
