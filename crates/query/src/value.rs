//! The value evaluator: computes expressions to [`Operand`]s.

use crate::ast::{ArithmeticOperator, Expression, Literal};
use crate::config::NonFiniteNumbers;
use crate::resolver::resolve;
use serde_json::{Map, Number, Value};
use std::fmt;

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// An explicit `null`, or a path that matched nothing.
    Null,
    Bool(bool),
    /// A number taken from the document or a literal, kept in its exact form.
    Number(Number),
    /// The result of arithmetic. May be `NaN` or infinite.
    Float(f64),
    Text(String),
    /// Several matched nodes, or an array node.
    List(Vec<Operand>),
    Object(Map<String, Value>),
}

impl Operand {
    /// Converts a document node into an operand.
    pub fn from_node(node: &Value) -> Self {
        match node {
            Value::Null => Operand::Null,
            Value::Bool(b) => Operand::Bool(*b),
            Value::Number(n) => Operand::Number(n.clone()),
            Value::String(s) => Operand::Text(s.clone()),
            Value::Array(items) => Operand::List(items.iter().map(Operand::from_node).collect()),
            Value::Object(map) => Operand::Object(map.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Operand::Text(_))
    }

    /// The numeric value, if the operand is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => n.as_f64(),
            Operand::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Coerces the operand to a number for arithmetic. Text that reads as a
    /// finite decimal number is converted; anything else becomes `0.0`.
    pub fn to_number(&self) -> f64 {
        match self {
            Operand::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            other => other.as_f64().unwrap_or(0.0),
        }
    }

    /// Converts the operand into a document node.
    ///
    /// Returns the offending number as the error when a non-finite float is
    /// found and `policy` is [`NonFiniteNumbers::Reject`].
    pub fn into_value(self, policy: NonFiniteNumbers) -> Result<Value, f64> {
        Ok(match self {
            Operand::Null => Value::Null,
            Operand::Bool(b) => Value::Bool(b),
            Operand::Number(n) => Value::Number(n),
            Operand::Float(f) => match Number::from_f64(f) {
                Some(n) => Value::Number(n),
                None => match policy {
                    NonFiniteNumbers::StoreNull => {
                        log::warn!("Storing non-finite number {} as null", f);
                        Value::Null
                    }
                    NonFiniteNumbers::Reject => return Err(f),
                },
            },
            Operand::Text(s) => Value::String(s),
            Operand::List(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| item.into_value(policy))
                    .collect::<Result<_, _>>()?,
            ),
            Operand::Object(map) => Value::Object(map),
        })
    }
}

impl From<&Literal> for Operand {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Operand::Null,
            Literal::Bool(b) => Operand::Bool(*b),
            Literal::Number(n) => Operand::Number(n.clone()),
            Literal::String(s) => Operand::Text(s.clone()),
        }
    }
}

impl fmt::Display for Operand {
    /// The textual form used by concatenation and text comparison. `null`
    /// renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Null => Ok(()),
            Operand::Bool(b) => write!(f, "{}", b),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Float(x) => match Number::from_f64(*x) {
                Some(n) => write!(f, "{}", n),
                None if x.is_nan() => f.write_str("NaN"),
                None if *x > 0.0 => f.write_str("Infinity"),
                None => f.write_str("-Infinity"),
            },
            Operand::Text(s) => f.write_str(s),
            Operand::List(_) | Operand::Object(_) => {
                let value = self.clone().into_value(NonFiniteNumbers::StoreNull);
                let value = value.unwrap_or(Value::Null);
                write!(f, "{}", value)
            }
        }
    }
}

/// Evaluates an expression against a context node.
pub fn evaluate(expr: &Expression, context: &Value) -> Operand {
    match expr {
        Expression::Literal(literal) => literal.into(),
        Expression::Path(path) => {
            let nodes = resolve(path, &[context]);
            log::trace!("Path '{}' matched {} node(s)", path, nodes.len());
            match nodes.as_slice() {
                [] => Operand::Null,
                [node] => Operand::from_node(node),
                many => Operand::List(many.iter().map(|n| Operand::from_node(n)).collect()),
            }
        }
        Expression::Arithmetic { left, op, right } => {
            arithmetic(*op, evaluate(left, context), evaluate(right, context))
        }
        Expression::Concat(left, right) => Operand::Text(format!(
            "{}{}",
            evaluate(left, context),
            evaluate(right, context)
        )),
        Expression::Group(inner) => evaluate(inner, context),
    }
}

fn arithmetic(op: ArithmeticOperator, left: Operand, right: Operand) -> Operand {
    if op == ArithmeticOperator::Add && left.is_text() && right.is_text() {
        return Operand::Text(format!("{}{}", left, right));
    }
    let l = left.to_number();
    let r = right.to_number();
    Operand::Float(match op {
        ArithmeticOperator::Add => l + r,
        ArithmeticOperator::Subtract => l - r,
        ArithmeticOperator::Multiply => l * r,
        ArithmeticOperator::Divide => l / r,
    })
}
