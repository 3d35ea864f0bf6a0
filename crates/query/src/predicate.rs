//! The predicate evaluator: comparisons and logical connectives.

use crate::ast::{ComparisonOperator, Predicate};
use crate::value::{Operand, evaluate};
use itertools::Itertools;
use serde_json::Value;
use std::cmp::Ordering;

/// Tests a predicate against a context node.
///
/// Prune clauses hold unconditionally here; they only narrow arrays when run
/// by a filter statement.
pub fn test(predicate: &Predicate, context: &Value) -> bool {
    match predicate {
        Predicate::Comparison { left, op, right } => {
            compare(&evaluate(left, context), *op, &evaluate(right, context))
        }
        Predicate::And(left, right) => test(left, context) && test(right, context),
        Predicate::Or(left, right) => test(left, context) || test(right, context),
        Predicate::Group(inner) => test(inner, context),
        Predicate::Prune(_) => true,
    }
}

/// Compares two operands. A list on either side matches if any of its
/// elements (paired with every element of the other side) matches.
pub fn compare(left: &Operand, op: ComparisonOperator, right: &Operand) -> bool {
    match (left, right) {
        (Operand::List(l), Operand::List(r)) => l
            .iter()
            .cartesian_product(r.iter())
            .any(|(a, b)| compare(a, op, b)),
        (Operand::List(l), _) => l.iter().any(|a| compare(a, op, right)),
        (_, Operand::List(r)) => r.iter().any(|b| compare(left, op, b)),
        _ => compare_scalars(left, op, right),
    }
}

fn compare_scalars(left: &Operand, op: ComparisonOperator, right: &Operand) -> bool {
    use ComparisonOperator::*;

    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return match op {
            Equals | StrictEquals => both,
            NotEquals | StrictNotEquals => !both,
            NotContains => true,
            _ => false,
        };
    }

    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return match op {
            Equals | StrictEquals => l == r,
            NotEquals | StrictNotEquals => l != r,
            GreaterThan => l > r,
            GreaterThanOrEqual => l >= r,
            LessThan => l < r,
            LessThanOrEqual => l <= r,
            Contains => left.to_string().contains(&right.to_string()),
            NotContains => !left.to_string().contains(&right.to_string()),
        };
    }

    let l = left.to_string();
    let r = right.to_string();
    match op {
        Equals => l.to_lowercase() == r.to_lowercase(),
        StrictEquals => l == r,
        NotEquals => l.to_lowercase() != r.to_lowercase(),
        StrictNotEquals => l != r,
        GreaterThan => l.cmp(&r) == Ordering::Greater,
        GreaterThanOrEqual => l.cmp(&r) != Ordering::Less,
        LessThan => l.cmp(&r) == Ordering::Less,
        LessThanOrEqual => l.cmp(&r) != Ordering::Greater,
        Contains => l.to_lowercase().contains(&r.to_lowercase()),
        NotContains => !l.to_lowercase().contains(&r.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_predicate;
    use serde_json::json;

    fn check(source: &str, context: &Value) -> bool {
        test(&parse_predicate(source).unwrap(), context)
    }

    #[test]
    fn test_case_sensitivity_of_equality_operators() {
        let ctx = json!({ "city": "Tehran" });
        assert!(check("city = \"tehran\"", &ctx));
        assert!(!check("city == \"tehran\"", &ctx));
        assert!(check("city == \"Tehran\"", &ctx));
        assert!(!check("city != \"TEHRAN\"", &ctx));
        assert!(check("city !== \"TEHRAN\"", &ctx));
    }

    #[test]
    fn test_containment() {
        let ctx = json!({ "family": "Sheikh Hosseini" });
        assert!(check("family ~ \"HOSS\"", &ctx));
        assert!(!check("family !~ \"hoss\"", &ctx));
        assert!(check("family !~ \"javadi\"", &ctx));
    }

    #[test]
    fn test_numeric_comparison() {
        let ctx = json!({ "age": 45, "score": 7.5 });
        assert!(check("age == 45", &ctx));
        assert!(check("age = 45.0", &ctx));
        assert!(check("age > 30 and age <= 45", &ctx));
        assert!(!check("age < 45", &ctx));
        assert!(check("score >= 7.5", &ctx));
        assert!(check("age ~ 4", &ctx));
    }

    #[test]
    fn test_text_ordering_is_lexicographic() {
        let ctx = json!({ "zip": "100" });
        // "100" < "9" as text, even though 100 > 9 as numbers.
        assert!(check("zip < \"9\"", &ctx));
        assert!(check("zip >= \"100\"", &ctx));
    }

    #[test]
    fn test_existential_comparison_over_arrays() {
        let ctx = json!({ "tags": ["red", "green"], "sizes": [1, 2], "other": [2, 3] });
        assert!(check("tags == \"green\"", &ctx));
        assert!(!check("tags == \"blue\"", &ctx));
        assert!(check("sizes == other", &ctx));
        assert!(!check("sizes > 5", &ctx));
        assert!(check("5 > sizes", &ctx));
    }

    #[test]
    fn test_empty_list_never_matches() {
        let ctx = json!({ "tags": [] });
        assert!(!check("tags == \"x\"", &ctx));
        assert!(!check("tags != \"x\"", &ctx));
    }

    #[test]
    fn test_null_and_missing_share_one_sentinel() {
        let ctx = json!({ "name": null, "age": 3 });
        assert!(check("name == null", &ctx));
        assert!(check("missing == null", &ctx));
        assert!(check("age != null", &ctx));
        assert!(!check("missing > 1", &ctx));
        assert!(!check("missing ~ \"\"", &ctx));
    }

    #[test]
    fn test_or_and_grouping() {
        let ctx = json!({ "age": 21, "city": "Pardis" });
        assert!(check("age == 45 or city == \"Pardis\"", &ctx));
        assert!(!check("age == 45 and (city == \"Pardis\" or city == \"Tehran\")", &ctx));
        assert!(check("(age == 45 or age == 21) and city = \"pardis\"", &ctx));
    }

    #[test]
    fn test_predicate_over_nested_array_segment() {
        let ctx = json!({ "address": [{ "state": "A" }, { "state": "B" }] });
        assert!(check("address[state == \"B\"].state == \"B\"", &ctx));
        assert!(!check("address[state == \"C\"].state == \"C\"", &ctx));
    }

    #[test]
    fn test_booleans_compare_as_text() {
        let ctx = json!({ "active": true });
        assert!(check("active == true", &ctx));
        assert!(check("active = \"TRUE\"", &ctx));
    }
}
