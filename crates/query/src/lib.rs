//! A small language for filtering and reshaping JSON documents.
//!
//! Operations are written as text, for example
//! `filter -> profile.age > 30 and city = "tehran"` or
//! `map -> fullName = name || " " || family`, parsed into [`Statement`]s and
//! applied to a `serde_json::Value` in place by an [`Engine`].

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod ops;
pub mod parser;
pub mod predicate;
pub mod resolver;
pub mod value;

// --- Public API ---
pub use ast::{
    ArithmeticOperator, ComparisonOperator, Expression, Literal, Path, Predicate, Program,
    Segment, SegmentKind, Statement,
};
pub use config::{EngineConfig, NonFiniteNumbers};
pub use engine::{Engine, apply, apply_all};
pub use error::QueryError;
pub use parser::{
    parse_expression, parse_filter, parse_map, parse_operation, parse_path, parse_predicate,
    parse_program,
};
pub use predicate::test;
pub use resolver::resolve;
pub use value::{Operand, evaluate};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_only_helpers_agree_with_filter() {
        let doc = json!([{ "age": 45 }, { "age": 21 }]);
        let predicate = parse_filter("filter -> age > 30").unwrap();
        let kept: Vec<_> = doc
            .as_array()
            .unwrap()
            .iter()
            .filter(|item| test(&predicate, item))
            .cloned()
            .collect();

        let mut filtered = doc.clone();
        apply(&mut filtered, "filter -> age > 30").unwrap();
        assert_eq!(filtered, json!(kept));
    }

    #[test]
    fn test_resolve_and_evaluate_from_the_root() {
        let doc = json!({ "profile": { "address": [{ "zip": 1 }, { "zip": 2 }] } });
        let path = parse_path("profile.address[].zip").unwrap();
        assert_eq!(resolve(&path, &[&doc]), vec![&json!(1), &json!(2)]);

        let expr = parse_expression("profile.address[1].zip * 2").unwrap();
        assert_eq!(evaluate(&expr, &doc).as_f64(), Some(4.0));
    }

    #[test]
    fn test_parse_map_without_marker() {
        let statement = parse_map("total = price * qty").unwrap();
        let mut doc = json!({ "price": 2, "qty": 3 });
        Engine::default().apply(&mut doc, &statement).unwrap();
        assert_eq!(doc["total"], json!(6.0));
    }
}
