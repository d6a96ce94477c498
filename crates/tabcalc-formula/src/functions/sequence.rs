//! Row-order dependent lookups (LAG, LEAD, DELTA, Δt)

use crate::context::EvaluationContext;
use crate::evaluator::{lookup, EvalResult, RowView, Value};
use tabcalc_core::FieldError;

/// Value of `column` on the previous row (0 before the first row)
pub fn lag(column: &str, ctx: &EvaluationContext) -> EvalResult<f64> {
    ctx.previous_value(column)
        .ok_or_else(|| FieldError::undefined_delta(format!("no previous value for {}", column)))
}

/// Value of `column` on the next row
///
/// The last row has no next row, which reports the column as missing.
pub fn lead(column: &str, view: &RowView<'_>, ctx: &EvaluationContext) -> EvalResult<Value> {
    let next = view.next.ok_or_else(|| FieldError::missing(column))?;
    lookup(next, column, ctx)
}

/// Elapsed time since the previous row
pub fn time_delta(view: &RowView<'_>, ctx: &EvaluationContext) -> EvalResult<f64> {
    let current = lookup(view.current, &ctx.options().time_column, ctx)?.as_number()?;
    let previous = ctx
        .previous_time()
        .ok_or_else(|| FieldError::undefined_delta("no previous time"))?;
    Ok(current - previous)
}

/// Change of `column` since the previous row
pub fn value_delta(column: &str, view: &RowView<'_>, ctx: &EvaluationContext) -> EvalResult<f64> {
    let current = lookup(view.current, column, ctx)?.as_number()?;
    Ok(current - lag(column, ctx)?)
}
