//! Evaluation context
//!
//! Holds everything a row evaluation needs beyond the row itself: the
//! aggregates computed over the whole table and the previous-row window used
//! by `lag`, `delta` and `Δt`.

use crate::ast::{AggregateKind, Expression};
use crate::functions::aggregate::ColumnStats;
use crate::references::ColumnReferences;
use ahash::AHashMap;
use log::{debug, trace};
use tabcalc_core::{FieldError, NameMatching, Row};

/// Default name of the column `Δt` reads
pub const DEFAULT_TIME_COLUMN: &str = "time";

/// Options controlling how a formula is evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Column holding the timestamp of each row
    pub time_column: String,
    /// How formula column references are matched against field names
    pub name_matching: NameMatching,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            name_matching: NameMatching::default(),
        }
    }
}

impl EvaluationOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time column
    pub fn with_time_column<S: Into<String>>(mut self, column: S) -> Self {
        self.time_column = column.into();
        self
    }

    /// Set the name matching mode
    pub fn with_name_matching(mut self, matching: NameMatching) -> Self {
        self.name_matching = matching;
        self
    }
}

/// Aggregates computed once per materialization
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    stats: AHashMap<String, ColumnStats>,
}

impl Aggregates {
    /// Scan `rows` once for every column in `columns`
    ///
    /// Only fields readable as numbers contribute; missing, text and error
    /// fields are skipped.
    pub fn compute<'a, I>(columns: I, rows: &[Row], matching: NameMatching) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let stats = columns
            .into_iter()
            .map(|column| {
                let stats: ColumnStats = rows
                    .iter()
                    .filter_map(|row| row.number(column, matching))
                    .collect();
                debug!("Aggregated column '{}' over {} values", column, stats.count());
                (column.to_string(), stats)
            })
            .collect();
        Self { stats }
    }

    /// Value of an aggregate
    ///
    /// A column that was never aggregated behaves like an empty one.
    pub fn get(&self, kind: AggregateKind, column: &str) -> Result<f64, FieldError> {
        self.stats
            .get(column)
            .copied()
            .unwrap_or_default()
            .finish(kind, column)
    }

    /// Number of aggregated columns
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Check if no column is aggregated
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Per-materialization evaluation state
///
/// The previous-row window starts at 0 for every lagged column and for the
/// time column, and moves forward with [`advance`](Self::advance) after each
/// row. A value that was missing or not numeric on the previous row is kept as
/// `None` so that `lag` can report it as undefined.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    options: EvaluationOptions,
    references: ColumnReferences,
    aggregates: Aggregates,
    previous_values: AHashMap<String, Option<f64>>,
    previous_time: Option<f64>,
    rows_seen: usize,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new(options: EvaluationOptions) -> Self {
        Self {
            options,
            references: ColumnReferences::default(),
            aggregates: Aggregates::default(),
            previous_values: AHashMap::new(),
            previous_time: Some(0.0),
            rows_seen: 0,
        }
    }

    /// Compute aggregates and reset the window for `expr` over `rows`
    pub fn prepare(&mut self, expr: &Expression, rows: &[Row]) {
        self.references = ColumnReferences::collect(expr);
        self.aggregates = Aggregates::compute(
            self.references.aggregated.iter().map(String::as_str),
            rows,
            self.options.name_matching,
        );
        self.previous_values = self
            .references
            .lagged
            .iter()
            .map(|column| (column.clone(), Some(0.0)))
            .collect();
        self.previous_time = Some(0.0);
        self.rows_seen = 0;
    }

    /// Move the window past `row`
    pub fn advance(&mut self, row: &Row) {
        let matching = self.options.name_matching;
        for (column, previous) in self.previous_values.iter_mut() {
            *previous = row.number(column, matching);
        }
        self.previous_time = row.number(&self.options.time_column, matching);
        self.rows_seen += 1;
        trace!(
            "Advanced window past row {} (time {:?})",
            self.rows_seen - 1,
            self.previous_time
        );
    }

    /// Evaluation options
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Columns referenced by the prepared expression
    pub fn references(&self) -> &ColumnReferences {
        &self.references
    }

    /// Precomputed aggregates
    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Value of an aggregate over the whole table
    pub fn aggregate(&self, kind: AggregateKind, column: &str) -> Result<f64, FieldError> {
        self.aggregates.get(kind, column)
    }

    /// Value of a lagged column on the previous row
    ///
    /// `None` when the previous row lacked a numeric value, or when the column
    /// is not tracked.
    pub fn previous_value(&self, column: &str) -> Option<f64> {
        self.previous_values.get(column).copied().flatten()
    }

    /// Time of the previous row, `None` if it had none
    pub fn previous_time(&self) -> Option<f64> {
        self.previous_time
    }

    /// Number of rows the window has moved past
    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new(EvaluationOptions::default())
    }
}
