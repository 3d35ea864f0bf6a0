//! A `nom`-based parser for operation text.
//!
//! Operations look like `filter -> age > 30 and city = "tehran"` or
//! `map -> profile.fullName = profile.name || " " || profile.family`.
use super::ast::*;
use crate::error::QueryError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{char, digit1, multispace0, one_of, satisfy, u64 as nom_u64},
    combinator::{map, map_res, not, opt, recognize, value, verify},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};
use serde_json::Number;

const OPERATIONS: [&str; 6] = ["filter", "map", "mute", "replace", "append", "rename"];
/// Markers that introduce an assignment. `mute` and `replace` are older
/// spellings of `map`.
const MAP_MARKERS: [&str; 3] = ["map", "mute", "replace"];
const KEYWORDS: [&str; 5] = ["and", "or", "null", "true", "false"];

// --- Main Public Parsers ---

/// Parses a single operation, e.g. `map -> name = "x"`. The text must start
/// with an operation marker (`filter ->`, `map ->`, `append ->`, `rename ->`).
pub fn parse_operation(input: &str) -> Result<Statement, QueryError> {
    check_marker(input, &OPERATIONS)?;
    complete(input, statement)
}

/// Parses a sequence of operations separated by whitespace, `;` or `|`.
pub fn parse_program(input: &str) -> Result<Program, QueryError> {
    check_marker(input, &OPERATIONS)?;
    complete(input, program)
}

/// Parses a filter clause, with or without its `filter ->` marker.
pub fn parse_filter(clause: &str) -> Result<Predicate, QueryError> {
    let body = strip_marker(clause, &["filter"])?;
    complete(body, predicate)
}

/// Parses an assignment clause, with or without its `map ->` marker.
pub fn parse_map(clause: &str) -> Result<Statement, QueryError> {
    let body = strip_marker(clause, &MAP_MARKERS)?;
    complete(body, assignment).map(|(target, value)| Statement::Map { target, value })
}

pub fn parse_predicate(input: &str) -> Result<Predicate, QueryError> {
    complete(input, predicate)
}

pub fn parse_expression(input: &str) -> Result<Expression, QueryError> {
    complete(input, expression)
}

pub fn parse_path(input: &str) -> Result<Path, QueryError> {
    complete(input, path)
}

fn complete<'a, T>(
    input: &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
) -> Result<T, QueryError> {
    match parser(input.trim()) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rem, _)) => Err(QueryError::parse(
            input,
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(QueryError::parse(input, e.to_string())),
    }
}

/// Fails with `MalformedOperation` unless the text before the first `->` is
/// one of the accepted operation keywords.
fn check_marker(input: &str, accepted: &[&str]) -> Result<(), QueryError> {
    let action = input.split_once("->").map(|(action, _)| action.trim());
    match action {
        Some(action) if accepted.iter().any(|k| k.eq_ignore_ascii_case(action)) => Ok(()),
        _ => Err(QueryError::MalformedOperation(format!(
            "'{}' should start with one of: {}",
            input.trim(),
            accepted
                .iter()
                .map(|k| format!("'{} ->'", k))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Returns the clause body, dropping a leading `<keyword> ->` if present.
fn strip_marker<'a>(clause: &'a str, accepted: &[&str]) -> Result<&'a str, QueryError> {
    match clause.split_once("->") {
        Some((_, body)) => {
            check_marker(clause, accepted)?;
            Ok(body)
        }
        None => Ok(clause),
    }
}

// --- Combinators & Helpers ---

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parses `operand (operator operand)*` and folds the result to the left.
fn build_binary_parser<'a, T, O, F, G, C>(
    operand: F,
    operator: G,
    combine: C,
) -> impl FnMut(&'a str) -> IResult<&'a str, T>
where
    F: Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>> + Clone,
    C: Fn(T, O, T) -> T,
{
    move |input: &str| {
        let (input, mut left) = operand.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(operator.clone()), operand.clone())).parse(input)?;

        for (op, right) in remainder {
            left = combine(left, op, right);
        }
        Ok((input, left))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// A case-insensitive keyword that is not the prefix of a longer identifier.
fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag_no_case(word), not(satisfy(is_ident_char)))
}

// --- Statement Parsers ---

fn marker<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(ws(tag_no_case(word)), ws(tag("->")))
}

fn assignment(input: &str) -> IResult<&str, (Path, Expression)> {
    let (input, target) = ws(path).parse(input)?;
    let (input, _) = ws(char('=')).parse(input)?;
    let (input, value) = expression(input)?;
    Ok((input, (target, value)))
}

fn statement(input: &str) -> IResult<&str, Statement> {
    alt((
        map(preceded(marker("filter"), predicate), Statement::Filter),
        map(
            preceded(
                alt((marker("map"), marker("mute"), marker("replace"))),
                assignment,
            ),
            |(target, value)| Statement::Map { target, value },
        ),
        map(preceded(marker("append"), assignment), |(target, value)| {
            Statement::Append { target, value }
        }),
        map(
            preceded(
                marker("rename"),
                (ws(path), ws(char('=')), ws(path)),
            ),
            |(target, _, source)| Statement::Rename { target, source },
        ),
    ))
    .parse(input)
}

fn program(input: &str) -> IResult<&str, Program> {
    map(
        many1(terminated(statement, opt(ws(one_of(";|"))))),
        Program::new,
    )
    .parse(input)
}

// --- Predicate Parsers (in order of precedence) ---

fn or_op(input: &str) -> IResult<&str, ()> {
    value((), keyword("or")).parse(input)
}

fn and_op(input: &str) -> IResult<&str, ()> {
    value((), keyword("and")).parse(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    build_binary_parser(and_predicate, or_op, |l, _, r| {
        Predicate::Or(Box::new(l), Box::new(r))
    })(input)
}

fn and_predicate(input: &str) -> IResult<&str, Predicate> {
    build_binary_parser(predicate_atom, and_op, |l, _, r| {
        Predicate::And(Box::new(l), Box::new(r))
    })(input)
}

fn predicate_atom(input: &str) -> IResult<&str, Predicate> {
    ws(alt((
        comparison,
        map(
            delimited(ws(char('(')), predicate, ws(char(')'))),
            |p| Predicate::Group(Box::new(p)),
        ),
        prune_clause,
    )))
    .parse(input)
}

fn comparator(input: &str) -> IResult<&str, ComparisonOperator> {
    alt((
        value(ComparisonOperator::StrictNotEquals, tag("!==")),
        value(ComparisonOperator::StrictEquals, tag("==")),
        value(ComparisonOperator::NotEquals, tag("!=")),
        value(ComparisonOperator::NotContains, tag("!~")),
        value(ComparisonOperator::GreaterThanOrEqual, tag(">=")),
        value(ComparisonOperator::LessThanOrEqual, tag("<=")),
        value(ComparisonOperator::Equals, tag("=")),
        value(ComparisonOperator::GreaterThan, tag(">")),
        value(ComparisonOperator::LessThan, tag("<")),
        value(ComparisonOperator::Contains, tag("~")),
    ))
    .parse(input)
}

fn comparison(input: &str) -> IResult<&str, Predicate> {
    map(
        (expression, ws(comparator), expression),
        |(left, op, right)| Predicate::Comparison { left, op, right },
    )
    .parse(input)
}

fn prune_clause(input: &str) -> IResult<&str, Predicate> {
    map(
        verify(path, |p: &Path| {
            p.segments.last().is_some_and(Segment::is_narrowing)
        }),
        Predicate::Prune,
    )
    .parse(input)
}

// --- Expression Parsers (in order of precedence) ---

fn concat_op(input: &str) -> IResult<&str, ()> {
    value((), tag("||")).parse(input)
}

fn additive_op(input: &str) -> IResult<&str, ArithmeticOperator> {
    alt((
        value(ArithmeticOperator::Add, char('+')),
        value(ArithmeticOperator::Subtract, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, ArithmeticOperator> {
    alt((
        value(ArithmeticOperator::Multiply, char('*')),
        value(ArithmeticOperator::Divide, char('/')),
    ))
    .parse(input)
}

fn arithmetic(left: Expression, op: ArithmeticOperator, right: Expression) -> Expression {
    Expression::Arithmetic {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn expression(input: &str) -> IResult<&str, Expression> {
    build_binary_parser(additive_expr, concat_op, |l, _, r| {
        Expression::Concat(Box::new(l), Box::new(r))
    })(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_parser(multiplicative_expr, additive_op, arithmetic)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_parser(primary_expr, multiplicative_op, arithmetic)(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map(literal, Expression::Literal),
        map(
            delimited(ws(char('(')), expression, ws(char(')'))),
            |e| Expression::Group(Box::new(e)),
        ),
        map(path, Expression::Path),
    )))
    .parse(input)
}

// --- Literal Parsers ---

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::Null, keyword("null")),
        value(Literal::Bool(true), keyword("true")),
        value(Literal::Bool(false), keyword("false")),
        map(number, Literal::Number),
        map(string_literal, Literal::String),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Number> {
    map_res(
        recognize((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        parse_number,
    )
    .parse(input)
}

/// Integers stay integers; anything with a fraction or exponent is a float.
fn parse_number(text: &str) -> Result<Number, String> {
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(n.into());
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(n.into());
        }
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| format!("invalid number '{}'", text))
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

// --- Path Parsers ---

fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        recognize(pair(satisfy(is_ident_start), take_while(is_ident_char))),
        |s: &str| !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s)),
    )
    .parse(input)
}

fn bracket(input: &str) -> IResult<&str, SegmentKind> {
    preceded(
        char('['),
        alt((
            value(SegmentKind::Expand, terminated(multispace0, char(']'))),
            map_res(terminated(ws(nom_u64), char(']')), |n| {
                usize::try_from(n).map(SegmentKind::Index)
            }),
            map(terminated(predicate, char(']')), |p| {
                SegmentKind::Filter(Box::new(p))
            }),
        )),
    )
    .parse(input)
}

fn segment(input: &str) -> IResult<&str, Segment> {
    let (input, name) = identifier(input)?;
    let (input, kind) = opt(bracket).parse(input)?;
    Ok((input, Segment::new(name, kind.unwrap_or(SegmentKind::Plain))))
}

/// A dotted path. A leading `[]` ("every root element") is accepted and
/// dropped, since operations already apply element-wise to array documents.
fn path(input: &str) -> IResult<&str, Path> {
    let (input, _) = opt(terminated(tag("[]"), opt(char('.')))).parse(input)?;
    map(separated_list1(char('.'), segment), Path::new).parse(input)
}
