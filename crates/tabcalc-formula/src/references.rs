//! Column reference collection
//!
//! Walks an expression once and records which columns it reads and how, so
//! the evaluation context knows which aggregates to precompute and which
//! previous-row values to track.

use crate::ast::{Expression, SequenceKind};
use std::collections::BTreeSet;

/// Columns an expression depends on, grouped by access pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnReferences {
    /// Columns read on the current row
    pub columns: BTreeSet<String>,
    /// Columns inside `sum`/`avg`/`count`/`min`/`max`
    pub aggregated: BTreeSet<String>,
    /// Columns inside `lag` or `delta`
    pub lagged: BTreeSet<String>,
    /// Columns inside `lead`
    pub led: BTreeSet<String>,
    /// Whether `Δt` appears
    pub uses_time_delta: bool,
}

impl ColumnReferences {
    /// Collect the references of an expression
    pub fn collect(expr: &Expression) -> Self {
        let mut refs = Self::default();
        refs.visit(expr);
        refs
    }

    /// Whether the expression depends on row order
    pub fn is_order_dependent(&self) -> bool {
        self.uses_time_delta || !self.lagged.is_empty() || !self.led.is_empty()
    }

    /// Every distinct column name mentioned, in sorted order
    pub fn all(&self) -> BTreeSet<&str> {
        self.columns
            .iter()
            .chain(&self.aggregated)
            .chain(&self.lagged)
            .chain(&self.led)
            .map(String::as_str)
            .collect()
    }

    fn visit(&mut self, expr: &Expression) {
        match expr {
            Expression::Number(_) | Expression::String(_) | Expression::Null => {}
            Expression::ColumnRef(name) => {
                self.columns.insert(name.clone());
            }
            Expression::BinaryOp { left, right, .. } => {
                self.visit(left);
                self.visit(right);
            }
            Expression::UnaryOp { operand, .. } => self.visit(operand),
            Expression::Aggregate { column, .. } => {
                self.aggregated.insert(column.clone());
            }
            Expression::Sequence {
                kind: SequenceKind::Lag,
                column,
            } => {
                self.lagged.insert(column.clone());
            }
            Expression::Sequence {
                kind: SequenceKind::Lead,
                column,
            } => {
                self.led.insert(column.clone());
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                self.visit(condition);
                self.visit(then_branch);
                self.visit(else_branch);
            }
            Expression::TimeDelta => self.uses_time_delta = true,
            Expression::ValueDelta { column } => {
                // delta(X) reads X now and X on the previous row
                self.columns.insert(column.clone());
                self.lagged.insert(column.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collect_density_rate() {
        let expr = parse_expression("if(Density > 5, (Density - lag(Density)) / Δt, null)").unwrap();
        let refs = ColumnReferences::collect(&expr);

        assert_eq!(refs.columns, set(&["Density"]));
        assert_eq!(refs.lagged, set(&["Density"]));
        assert!(refs.aggregated.is_empty());
        assert!(refs.led.is_empty());
        assert!(refs.uses_time_delta);
        assert!(refs.is_order_dependent());
    }

    #[test]
    fn test_collect_aggregates_and_lead() {
        let expr = parse_expression("(Volume - avg(Volume)) / max(Weight) + lead(OD) + delta(pH)").unwrap();
        let refs = ColumnReferences::collect(&expr);

        assert_eq!(refs.columns, set(&["Volume", "pH"]));
        assert_eq!(refs.aggregated, set(&["Volume", "Weight"]));
        assert_eq!(refs.lagged, set(&["pH"]));
        assert_eq!(refs.led, set(&["OD"]));
        assert!(!refs.uses_time_delta);
        assert_eq!(
            refs.all().into_iter().collect::<Vec<_>>(),
            vec!["OD", "Volume", "Weight", "pH"]
        );
    }

    #[test]
    fn test_collect_constant() {
        let refs = ColumnReferences::collect(&parse_expression("1 + 2").unwrap());
        assert_eq!(refs, ColumnReferences::default());
        assert!(!refs.is_order_dependent());
    }
}
