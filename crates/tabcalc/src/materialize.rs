//! Derived column materialization
//!
//! Evaluates a parsed formula on every row of a table, in table order, and
//! appends the result as a new field.
//!
//! # Example
//!
//! ```rust
//! use tabcalc::prelude::*;
//!
//! let mut table = Table::from_rows(
//!     [(3, 0), (6, 1), (9, 2)]
//!         .into_iter()
//!         .map(|(d, t)| Row::new().with_field("Density", d).with_field("time", t))
//!         .collect(),
//! );
//!
//! let stats = table
//!     .add_derived_column("Rate = if(Density > 5, (Density - lag(Density)) / Δt, null)")
//!     .unwrap();
//! assert_eq!((stats.strings, stats.numbers), (1, 2));
//! ```

use crate::{
    evaluate_field, EvaluationContext, EvaluationOptions, Expression, Field, FieldError,
    FieldKind, FormulaDefinition, NameMatching, ParseError, RowView, Table,
};
use log::{debug, trace, warn};

/// Options for materializing a derived column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Options passed to the row evaluator
    pub evaluation: EvaluationOptions,
}

impl MaterializeOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column `Δt` reads (default: `time`)
    pub fn with_time_column<S: Into<String>>(mut self, column: S) -> Self {
        self.evaluation = self.evaluation.with_time_column(column);
        self
    }

    /// Set how formula column references are matched to field names
    pub fn with_name_matching(mut self, matching: NameMatching) -> Self {
        self.evaluation = self.evaluation.with_name_matching(matching);
        self
    }
}

/// Statistics from a materialization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    /// Number of rows that received the new field
    pub rows: usize,
    /// Fields of kind Number
    pub numbers: usize,
    /// Fields of kind String
    pub strings: usize,
    /// Fields of kind Error
    pub errors: usize,
}

impl MaterializeStats {
    fn record(&mut self, field: &Field) {
        self.rows += 1;
        match field.kind() {
            FieldKind::Number => self.numbers += 1,
            FieldKind::String => self.strings += 1,
            FieldKind::Error => self.errors += 1,
        }
    }

    /// Whether every row computed without an error
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Extension trait for Table to add derived columns
pub trait TableFormulaExt {
    /// Parse `input` and materialize it with default options
    fn add_derived_column(&mut self, input: &str) -> Result<MaterializeStats, ParseError>;

    /// Parse `input` and materialize it with custom options
    ///
    /// A [`ParseError`] is returned before any row is touched.
    fn add_derived_column_with_options(
        &mut self,
        input: &str,
        options: &MaterializeOptions,
    ) -> Result<MaterializeStats, ParseError>;
}

impl TableFormulaExt for Table {
    fn add_derived_column(&mut self, input: &str) -> Result<MaterializeStats, ParseError> {
        self.add_derived_column_with_options(input, &MaterializeOptions::default())
    }

    fn add_derived_column_with_options(
        &mut self,
        input: &str,
        options: &MaterializeOptions,
    ) -> Result<MaterializeStats, ParseError> {
        let definition = crate::parse(input)?;
        Ok(materialize(self, &definition, options))
    }
}

/// Append the derived column `formula` to every row of `table`
///
/// Never stops early: an expression that fails to parse gives every row an
/// unsupported-formula error, and per-row failures are stored in that row's
/// field. The column name is registered on the table afterwards.
pub fn materialize(
    table: &mut Table,
    formula: &FormulaDefinition,
    options: &MaterializeOptions,
) -> MaterializeStats {
    let mut engine = MaterializeEngine::new(options.clone());
    let stats = engine.run(table, formula);
    table.push_column(formula.name.as_str());

    debug!(
        "Materialized '{}': {} rows ({} numbers, {} strings, {} errors)",
        formula.name, stats.rows, stats.numbers, stats.strings, stats.errors
    );
    stats
}

/// The materialization engine
struct MaterializeEngine {
    context: EvaluationContext,
}

impl MaterializeEngine {
    fn new(options: MaterializeOptions) -> Self {
        Self {
            context: EvaluationContext::new(options.evaluation),
        }
    }

    fn run(&mut self, table: &mut Table, formula: &FormulaDefinition) -> MaterializeStats {
        debug!(
            "Materializing '{}' = '{}' over {} rows",
            formula.name,
            formula.expression_text,
            table.len()
        );

        match formula.expression() {
            Ok(expr) => self.evaluate_rows(table, &formula.name, &expr),
            Err(e) => {
                warn!(
                    "Formula '{}' is not supported ({}), every row gets an error",
                    formula.expression_text, e
                );
                Self::fill_unsupported(table, &formula.name)
            }
        }
    }

    fn evaluate_rows(
        &mut self,
        table: &mut Table,
        name: &str,
        expr: &Expression,
    ) -> MaterializeStats {
        let mut stats = MaterializeStats::default();

        // Phase 1: aggregates and the initial window
        self.context.prepare(expr, table.rows());

        // Phase 2: rows in table order
        for index in 0..table.len() {
            let field = {
                let rows = table.rows();
                let view = RowView::new(index, &rows[index], rows.get(index + 1));
                let field = evaluate_field(name, expr, &view, &self.context);
                // The window reads the row as it was before the new field
                self.context.advance(view.current);
                field
            };

            trace!("Row {}: {} = {}", index, name, field.value);
            stats.record(&field);
            table.rows_mut()[index].push(field);
        }

        stats
    }

    fn fill_unsupported(table: &mut Table, name: &str) -> MaterializeStats {
        let mut stats = MaterializeStats::default();
        for row in table.rows_mut() {
            let field = Field::new(name, FieldError::UnsupportedFormula);
            stats.record(&field);
            row.push(field);
        }
        stats
    }
}
