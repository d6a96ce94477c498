//! Expression tree types

use crate::functions::registry;
use std::fmt;

/// Parsed expression of a derived-column formula
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// `null` marker (evaluates to the string `"null"`)
    Null,

    // === References ===
    /// Value of a column on the current row
    ColumnRef(String),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    // === Built-ins ===
    /// Table-wide aggregate over a column
    Aggregate { kind: AggregateKind, column: String },
    /// Previous/next row value of a column
    Sequence { kind: SequenceKind, column: String },
    /// `if(condition, then, else)`
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    /// Elapsed time since the previous row (`Δt`)
    TimeDelta,
    /// Change of a column since the previous row (`delta(X)`)
    ValueDelta { column: String },
}

impl Expression {
    /// Column reference
    pub fn column<S: Into<String>>(name: S) -> Self {
        Expression::ColumnRef(name.into())
    }

    /// Binary operation
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Expression::Number(_) => "number",
            Expression::String(_) => "string",
            Expression::Null => "null",
            Expression::ColumnRef(_) => "column reference",
            Expression::BinaryOp { .. } | Expression::UnaryOp { .. } => "operation",
            Expression::Aggregate { .. } => "aggregate",
            Expression::Sequence { .. } => "sequence function",
            Expression::Conditional { .. } => "if",
            Expression::TimeDelta => "Δt",
            Expression::ValueDelta { .. } => "delta",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    GreaterThan,
    LessThan,
    NotEqual,
}

impl BinaryOperator {
    /// Canonical symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThan => "<",
            BinaryOperator::NotEqual => "<>",
        }
    }

    /// Whether this operator produces a boolean
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::GreaterThan | BinaryOperator::LessThan | BinaryOperator::NotEqual
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

/// Table-wide aggregates, computed once before row iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl AggregateKind {
    /// Function name as written in formulas
    pub fn name(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "sum",
            AggregateKind::Avg => "avg",
            AggregateKind::Count => "count",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        }
    }
}

/// Row-order dependent lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Lag,
    Lead,
}

impl SequenceKind {
    /// Function name as written in formulas
    pub fn name(&self) -> &'static str {
        match self {
            SequenceKind::Lag => "lag",
            SequenceKind::Lead => "lead",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{}", n),
            Expression::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Expression::Null => f.write_str("null"),
            Expression::ColumnRef(name) => write_column(f, name),
            Expression::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expression::UnaryOp {
                op: UnaryOperator::Negate,
                operand,
            } => write!(f, "-{}", operand),
            Expression::Aggregate { kind, column } => {
                write!(f, "{}(", kind.name())?;
                write_column(f, column)?;
                f.write_str(")")
            }
            Expression::Sequence { kind, column } => {
                write!(f, "{}(", kind.name())?;
                write_column(f, column)?;
                f.write_str(")")
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "if({}, {}, {})", condition, then_branch, else_branch),
            Expression::TimeDelta => f.write_str("Δt"),
            Expression::ValueDelta { column } => {
                f.write_str("delta(")?;
                write_column(f, column)?;
                f.write_str(")")
            }
        }
    }
}

/// Words with a fixed meaning in expressions
pub(crate) fn keyword(word: &str) -> Option<Expression> {
    if word.eq_ignore_ascii_case("null") {
        Some(Expression::Null)
    } else if word == "Δt" || word.eq_ignore_ascii_case("dt") {
        Some(Expression::TimeDelta)
    } else {
        None
    }
}

/// Bracket names the bare-word grammar would not read back as one column
fn write_column(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let bare = name.split(' ').all(|word| {
        if keyword(word).is_some() || registry().get(word).is_some() {
            return false;
        }
        let mut chars = word.chars();
        matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    });
    if bare {
        f.write_str(name)
    } else {
        write!(f, "[{}]", name)
    }
}
