//! Row evaluator

use crate::ast::{BinaryOperator, Expression, SequenceKind, UnaryOperator};
use crate::context::EvaluationContext;
use crate::functions::sequence;
use std::cmp::Ordering;
use tabcalc_core::{Field, FieldError, FieldValue, Row};

/// Result type for row evaluation
///
/// The error is a per-row [`FieldError`], which ends up stored in the field
/// instead of aborting the materialization.
pub type EvalResult<T> = Result<T, FieldError>;

/// Text produced by the `null` marker
pub const NULL_TEXT: &str = "null";

/// Intermediate value during evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// Convert a stored field value
    ///
    /// An error field propagates its own error.
    pub fn from_field(value: &FieldValue) -> EvalResult<Self> {
        match value {
            FieldValue::Number(n) => Ok(Value::Number(*n)),
            FieldValue::String(s) => Ok(Value::Text(s.as_str().to_string())),
            FieldValue::Error(e) => Err(e.clone()),
        }
    }

    /// Read as a number, accepting number-like text
    pub fn as_number(&self) -> EvalResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => s
                .trim()
                .parse()
                .ok()
                .filter(|n: &f64| n.is_finite())
                .ok_or_else(|| FieldError::type_mismatch("number", format!("text \"{}\"", s))),
            Value::Boolean(_) => Err(FieldError::type_mismatch("number", "boolean")),
        }
    }

    /// Truthiness for `if`: non-zero numbers and `true`
    pub fn is_truthy(&self) -> EvalResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Number(n) => Ok(*n != 0.0),
            Value::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            Value::Text(_) => self
                .as_number()
                .map(|n| n != 0.0)
                .map_err(|_| FieldError::type_mismatch("boolean", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Convert the final value into a stored field value
    pub fn into_field_value(self) -> EvalResult<FieldValue> {
        match self {
            Value::Number(n) if n.is_finite() => Ok(FieldValue::Number(n)),
            Value::Number(n) => Err(FieldError::undefined_delta(format!(
                "result is not a finite number ({})",
                n
            ))),
            Value::Text(s) => Ok(FieldValue::string(s)),
            Value::Boolean(b) => Ok(FieldValue::string(if b { "true" } else { "false" })),
        }
    }
}

/// The rows an evaluation can see: the current one and the one after it
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    /// Position of the current row in the table
    pub index: usize,
    /// Row being evaluated
    pub current: &'a Row,
    /// Following row, `None` on the last row
    pub next: Option<&'a Row>,
}

impl<'a> RowView<'a> {
    /// Create a view
    pub fn new(index: usize, current: &'a Row, next: Option<&'a Row>) -> Self {
        Self {
            index,
            current,
            next,
        }
    }

    /// View of row `index` within `rows`
    pub fn of(rows: &'a [Row], index: usize) -> Option<Self> {
        rows.get(index)
            .map(|current| Self::new(index, current, rows.get(index + 1)))
    }

    /// Whether this is the last row
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Evaluate an expression against one row
pub fn evaluate(
    expr: &Expression,
    view: &RowView<'_>,
    ctx: &EvaluationContext,
) -> EvalResult<Value> {
    match expr {
        Expression::Number(n) => Ok(Value::Number(*n)),
        Expression::String(s) => Ok(Value::Text(s.clone())),
        Expression::Null => Ok(Value::Text(NULL_TEXT.to_string())),

        Expression::ColumnRef(name) => lookup(view.current, name, ctx),

        Expression::BinaryOp { op, left, right } => {
            let left = evaluate(left, view, ctx)?;
            let right = evaluate(right, view, ctx)?;
            binary_op(*op, &left, &right)
        }

        Expression::UnaryOp {
            op: UnaryOperator::Negate,
            operand,
        } => {
            let value = evaluate(operand, view, ctx)?.as_number()?;
            Ok(Value::Number(-value))
        }

        Expression::Aggregate { kind, column } => ctx.aggregate(*kind, column).map(Value::Number),

        Expression::Sequence {
            kind: SequenceKind::Lag,
            column,
        } => sequence::lag(column, ctx).map(Value::Number),
        Expression::Sequence {
            kind: SequenceKind::Lead,
            column,
        } => sequence::lead(column, view, ctx),

        // Only the chosen branch is evaluated
        Expression::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            if evaluate(condition, view, ctx)?.is_truthy()? {
                evaluate(then_branch, view, ctx)
            } else {
                evaluate(else_branch, view, ctx)
            }
        }

        Expression::TimeDelta => sequence::time_delta(view, ctx).map(Value::Number),
        Expression::ValueDelta { column } => {
            sequence::value_delta(column, view, ctx).map(Value::Number)
        }
    }
}

/// Evaluate an expression into a named field
///
/// Never fails: evaluation errors are stored as the field's value.
pub fn evaluate_field(
    name: &str,
    expr: &Expression,
    view: &RowView<'_>,
    ctx: &EvaluationContext,
) -> Field {
    let value = evaluate(expr, view, ctx)
        .and_then(Value::into_field_value)
        .unwrap_or_else(FieldValue::Error);
    Field::new(name, value)
}

/// Resolve a column on `row` and read its value
pub(crate) fn lookup(row: &Row, column: &str, ctx: &EvaluationContext) -> EvalResult<Value> {
    let field = row
        .find(column, ctx.options().name_matching)
        .ok_or_else(|| FieldError::missing(column))?;
    Value::from_field(&field.value)
}

fn binary_op(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    if op.is_comparison() {
        return compare(op, left, right).map(Value::Boolean);
    }

    let l = left.as_number()?;
    let r = right.as_number()?;

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(FieldError::undefined_delta("division by zero"));
            }
            l / r
        }
        BinaryOperator::Power => l.powf(r),
        BinaryOperator::GreaterThan | BinaryOperator::LessThan | BinaryOperator::NotEqual => {
            return compare(op, left, right).map(Value::Boolean)
        }
    };

    Ok(Value::Number(result))
}

fn compare(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<bool> {
    let ordering = match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (Value::Boolean(_), _) | (_, Value::Boolean(_)) => None,
        _ => match (left.as_number(), right.as_number()) {
            (Ok(a), Ok(b)) if a.is_nan() || b.is_nan() => {
                return Err(FieldError::type_mismatch("number", "NaN"));
            }
            (Ok(a), Ok(b)) => a.partial_cmp(&b),
            _ => match (left, right) {
                (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
                _ => None,
            },
        },
    };

    match (op, ordering) {
        (BinaryOperator::GreaterThan, Some(ord)) => Ok(ord == Ordering::Greater),
        (BinaryOperator::LessThan, Some(ord)) => Ok(ord == Ordering::Less),
        (BinaryOperator::NotEqual, Some(ord)) => Ok(ord != Ordering::Equal),
        (BinaryOperator::NotEqual, None) => Ok(true),
        _ if left.type_name() == right.type_name() => Ok(false),
        _ => Err(FieldError::type_mismatch(left.type_name(), right.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use pretty_assertions::assert_eq;

    fn eval_rows(formula: &str, rows: &[Row]) -> Vec<FieldValue> {
        let expr = parse_expression(formula).unwrap();
        let mut ctx = EvaluationContext::default();
        ctx.prepare(&expr, rows);

        (0..rows.len())
            .map(|i| {
                let view = RowView::of(rows, i).unwrap();
                let field = evaluate_field("out", &expr, &view, &ctx);
                ctx.advance(&rows[i]);
                field.value
            })
            .collect()
    }

    fn eval_one(formula: &str, row: Row) -> FieldValue {
        eval_rows(formula, &[row]).remove(0)
    }

    #[test]
    fn test_arithmetic() {
        let row = Row::new().with_field("a", 6).with_field("b", 4);
        assert_eq!(eval_one("a + b", row.clone()), FieldValue::Number(10.0));
        assert_eq!(eval_one("a - b * 2", row.clone()), FieldValue::Number(-2.0));
        assert_eq!(eval_one("a ÷ b", row.clone()), FieldValue::Number(1.5));
        assert_eq!(eval_one("b ^ 0.5", row.clone()), FieldValue::Number(2.0));
        assert_eq!(eval_one("-a", row), FieldValue::Number(-6.0));
    }

    #[test]
    fn test_numeric_text_coerces() {
        let row = Row::new().with_field("a", "3.5").with_field("b", 2);
        assert_eq!(eval_one("a * b", row), FieldValue::Number(7.0));
    }

    #[test]
    fn test_missing_operand() {
        let row = Row::new().with_field("a", 1);
        assert_eq!(
            eval_one("a + Volume", row),
            FieldValue::Error(FieldError::missing("Volume"))
        );
    }

    #[test]
    fn test_type_mismatch() {
        let row = Row::new().with_field("a", 1).with_field("label", "flask");
        assert!(matches!(
            eval_one("a + label", row.clone()),
            FieldValue::Error(FieldError::TypeMismatch { .. })
        ));
        assert!(matches!(
            eval_one("a > label", row),
            FieldValue::Error(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_error_field_propagates() {
        let error = FieldError::undefined_delta("no previous time");
        let row = Row::new().with_field("rate", error.clone());
        assert_eq!(eval_one("rate * 2", row), FieldValue::Error(error));
    }

    #[test]
    fn test_division_by_zero() {
        let row = Row::new().with_field("a", 1);
        assert_eq!(
            eval_one("a / 0", row),
            FieldValue::Error(FieldError::undefined_delta("division by zero"))
        );
    }

    #[test]
    fn test_non_finite_result() {
        let row = Row::new().with_field("a", 10);
        assert!(matches!(
            eval_one("a ^ 1000", row),
            FieldValue::Error(FieldError::UndefinedDelta { .. })
        ));
    }

    #[test]
    fn test_comparisons() {
        let row = Row::new()
            .with_field("a", 6)
            .with_field("name", "beta")
            .with_field("text num", "10");
        assert_eq!(eval_one("a > 5", row.clone()), FieldValue::string("true"));
        assert_eq!(eval_one("a < 5", row.clone()), FieldValue::string("false"));
        assert_eq!(eval_one("a <> 6", row.clone()), FieldValue::string("false"));
        assert_eq!(eval_one("name > \"alpha\"", row.clone()), FieldValue::string("true"));
        assert_eq!(eval_one("[text num] > a", row.clone()), FieldValue::string("true"));
        assert_eq!(eval_one("a <> name", row), FieldValue::string("true"));
    }

    #[test]
    fn test_comparison_with_nan_is_an_error() {
        let row = Row::new().with_field("a", f64::NAN).with_field("label", "NaN");
        assert!(matches!(
            eval_one("a > 1", row.clone()),
            FieldValue::Error(FieldError::TypeMismatch { .. })
        ));
        // NaN as text is not a number
        assert_eq!(
            eval_one("label + 1", row),
            FieldValue::Error(FieldError::type_mismatch("number", "text \"NaN\""))
        );
    }

    #[test]
    fn test_conditional_short_circuits() {
        let row = Row::new().with_field("a", 1);
        // The missing column in the other branch is never read
        assert_eq!(eval_one("if(a > 0, a, Missing)", row.clone()), FieldValue::Number(1.0));
        assert_eq!(eval_one("if(a, 7)", row.clone()), FieldValue::Number(7.0));
        assert_eq!(eval_one("if(a - 1, 7)", row), FieldValue::string("null"));
    }

    #[test]
    fn test_density_rate() {
        let rows: Vec<Row> = [(3, 0), (6, 1), (9, 2)]
            .into_iter()
            .map(|(density, time)| {
                Row::new()
                    .with_field("Density", density)
                    .with_field("time", time)
            })
            .collect();
        let values = eval_rows("if(Density > 5, (Density - lag(Density)) / Δt, null)", &rows);
        assert_eq!(
            values,
            vec![
                FieldValue::string("null"),
                FieldValue::Number(3.0),
                FieldValue::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_zero_elapsed_time() {
        let rows = vec![
            Row::new().with_field("Density", 6).with_field("time", 0),
            Row::new().with_field("Density", 7).with_field("time", 0),
        ];
        let values = eval_rows("delta(Density) / Δt", &rows);
        assert!(values
            .iter()
            .all(|v| v == &FieldValue::Error(FieldError::undefined_delta("division by zero"))));
    }

    #[test]
    fn test_lag_after_missing_value() {
        let rows = vec![
            Row::new().with_field("x", 1),
            Row::new(),
            Row::new().with_field("x", 3),
        ];
        let values = eval_rows("lag(x)", &rows);
        assert_eq!(values[0], FieldValue::Number(0.0));
        assert_eq!(values[1], FieldValue::Number(1.0));
        assert!(matches!(
            values[2],
            FieldValue::Error(FieldError::UndefinedDelta { .. })
        ));
    }

    #[test]
    fn test_lead_and_aggregates() {
        let rows: Vec<Row> = [2, 4, 9]
            .into_iter()
            .map(|v| Row::new().with_field("v", v))
            .collect();
        assert_eq!(
            eval_rows("lead(v) - v", &rows),
            vec![
                FieldValue::Number(2.0),
                FieldValue::Number(5.0),
                FieldValue::Error(FieldError::missing("v")),
            ]
        );
        assert_eq!(
            eval_rows("v / sum(v)", &rows)[2],
            FieldValue::Number(9.0 / 15.0)
        );
        assert_eq!(
            eval_rows("max(v) - min(v) + count(v) + avg(v)", &rows)[0],
            FieldValue::Number(7.0 + 3.0 + 5.0)
        );
    }

    #[test]
    fn test_row_view() {
        let rows = vec![Row::new(), Row::new()];
        assert!(!RowView::of(&rows, 0).unwrap().is_last());
        assert!(RowView::of(&rows, 1).unwrap().is_last());
        assert!(RowView::of(&rows, 2).is_none());
    }
}
