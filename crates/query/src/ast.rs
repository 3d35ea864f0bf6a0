//! Defines the Abstract Syntax Tree (AST) for transformation programs.
use serde_json::Number;
use std::fmt;

/// A literal value written directly in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// An expression producing a value relative to a context node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    /// A path selecting nodes below the context node.
    Path(Path),
    Arithmetic {
        left: Box<Expression>,
        op: ArithmeticOperator,
        right: Box<Expression>,
    },
    /// Textual concatenation (`||`), regardless of operand types.
    Concat(Box<Expression>, Box<Expression>),
    /// A parenthesized expression.
    Group(Box<Expression>),
}

impl Expression {
    /// Checks if the expression is a `Path` variant.
    pub fn is_path(&self) -> bool {
        matches!(self, Expression::Path(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// A boolean condition evaluated against a context node.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Comparison {
        left: Expression,
        op: ComparisonOperator,
        right: Expression,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Group(Box<Predicate>),
    /// A bare path ending in `name[n]` or `name[predicate]`. Inside a filter
    /// statement the addressed arrays are narrowed in place; the clause itself
    /// always holds.
    Prune(Path),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `=`: case-insensitive for text.
    Equals,
    /// `==`: exact.
    StrictEquals,
    /// `!=`
    NotEquals,
    /// `!==`
    StrictNotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// `~`: case-insensitive containment.
    Contains,
    /// `!~`
    NotContains,
}

impl ComparisonOperator {
    /// The textual form of the operator as written in a predicate.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "=",
            ComparisonOperator::StrictEquals => "==",
            ComparisonOperator::NotEquals => "!=",
            ComparisonOperator::StrictNotEquals => "!==",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Contains => "~",
            ComparisonOperator::NotContains => "!~",
        }
    }
}

/// How a path segment treats the field it names.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// `name`
    Plain,
    /// `name[]`: every element of the array field.
    Expand,
    /// `name[n]`
    Index(usize),
    /// `name[predicate]`: the elements of the array field matching the predicate.
    Filter(Box<Predicate>),
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SegmentKind::Plain,
        }
    }

    pub fn new(name: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns true if the segment narrows an array field in place when used
    /// as the last step of a prune clause.
    pub fn is_narrowing(&self) -> bool {
        matches!(self.kind, SegmentKind::Index(_) | SegmentKind::Filter(_))
    }
}

/// A dotted/bracketed path, e.g. `profile.address[state == "B"].zip`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Builds a path of plain segments from a dotted string. Intended for tests
    /// and programmatic construction; no brackets are interpreted.
    pub fn from_dotted(dotted: &str) -> Self {
        Self::new(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(Segment::plain)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits the path into the container prefix and the final segment.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            match &segment.kind {
                SegmentKind::Plain => {}
                SegmentKind::Expand => f.write_str("[]")?,
                SegmentKind::Index(n) => write!(f, "[{}]", n)?,
                SegmentKind::Filter(_) => f.write_str("[..]")?,
            }
        }
        Ok(())
    }
}

/// A single transformation applied to a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `filter -> predicate`
    Filter(Predicate),
    /// `map -> path = expression`
    Map { target: Path, value: Expression },
    /// `append -> path = expression`: like `map`, but never overwrites.
    Append { target: Path, value: Expression },
    /// `rename -> path = source`
    Rename { target: Path, source: Path },
}

impl Statement {
    /// The operation keyword that introduces this statement.
    pub fn keyword(&self) -> &'static str {
        match self {
            Statement::Filter(_) => "filter",
            Statement::Map { .. } => "map",
            Statement::Append { .. } => "append",
            Statement::Rename { .. } => "rename",
        }
    }
}

/// An ordered sequence of statements applied against the same document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl FromIterator<Statement> for Program {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
