//! Table-wide aggregates (SUM, AVG, COUNT, MIN, MAX)

use crate::ast::AggregateKind;
use tabcalc_core::FieldError;

/// Running statistics of the numeric values of one column
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStats {
    sum: f64,
    count: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl ColumnStats {
    /// Empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one numeric value
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Number of values seen
    pub fn count(&self) -> usize {
        self.count
    }

    /// Final value of an aggregate
    ///
    /// `sum` and `count` of an empty column are 0; `avg`, `min` and `max`
    /// have no value and report the column as a missing operand.
    pub fn finish(&self, kind: AggregateKind, column: &str) -> Result<f64, FieldError> {
        match kind {
            AggregateKind::Sum => Ok(self.sum),
            AggregateKind::Count => Ok(self.count as f64),
            AggregateKind::Avg if self.count > 0 => Ok(self.sum / self.count as f64),
            AggregateKind::Min => self.min.ok_or_else(|| FieldError::missing(column)),
            AggregateKind::Max => self.max.ok_or_else(|| FieldError::missing(column)),
            AggregateKind::Avg => Err(FieldError::missing(column)),
        }
    }
}

impl FromIterator<f64> for ColumnStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish() {
        let stats: ColumnStats = [10.0, 20.0, 30.0].into_iter().collect();
        assert_eq!(stats.finish(AggregateKind::Sum, "x"), Ok(60.0));
        assert_eq!(stats.finish(AggregateKind::Avg, "x"), Ok(20.0));
        assert_eq!(stats.finish(AggregateKind::Count, "x"), Ok(3.0));
        assert_eq!(stats.finish(AggregateKind::Min, "x"), Ok(10.0));
        assert_eq!(stats.finish(AggregateKind::Max, "x"), Ok(30.0));
    }

    #[test]
    fn test_empty_column() {
        let stats = ColumnStats::new();
        assert_eq!(stats.finish(AggregateKind::Sum, "x"), Ok(0.0));
        assert_eq!(stats.finish(AggregateKind::Count, "x"), Ok(0.0));
        for kind in [AggregateKind::Avg, AggregateKind::Min, AggregateKind::Max] {
            assert_eq!(stats.finish(kind, "x"), Err(FieldError::missing("x")));
        }
    }

    #[test]
    fn test_negative_values() {
        let stats: ColumnStats = [-1.5, 4.0, -7.0].into_iter().collect();
        assert_eq!(stats.finish(AggregateKind::Min, "x"), Ok(-7.0));
        assert_eq!(stats.finish(AggregateKind::Max, "x"), Ok(4.0));
        assert_eq!(stats.count(), 3);
    }
}
