//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use log::debug;
use tabcalc_core::{FieldValue, Row, StringPool, Table};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read CSV file into a table
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Table> {
        let path = path.as_ref();
        debug!("Reading CSV from {}", path.display());
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a table
    ///
    /// With a header the first record names the columns; without one the
    /// columns are named `column1`, `column2`, and so on. Empty cells are
    /// left out of the row entirely.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .from_reader(reader);

        let headers: Option<Vec<String>> = if options.has_header {
            Some(
                csv_reader
                    .headers()?
                    .iter()
                    .map(|h| h.trim().to_string())
                    .collect(),
            )
        } else {
            None
        };

        let mut pool = StringPool::new();
        let mut rows = Vec::new();

        // Read records
        for result in csv_reader.records() {
            let record = result?;
            let mut row = Row::new();

            for (col, field) in record.iter().enumerate() {
                let Some(value) = Self::detect_type(field, options.auto_detect_types, &mut pool)
                else {
                    continue;
                };

                let name = match headers.as_ref().and_then(|h| h.get(col)) {
                    Some(name) => name.clone(),
                    None => format!("column{}", col + 1),
                };
                row.push_value(name, value);
            }

            rows.push(row);
        }

        let table = match headers {
            Some(headers) => {
                let mut table = Table::with_columns(headers)?;
                for row in rows {
                    table.push_row(row);
                }
                table
            }
            None => Table::from_rows(rows),
        };

        debug!(
            "Read {} rows, {} columns ({} distinct strings)",
            table.len(),
            table.columns().len(),
            pool.len()
        );
        Ok(table)
    }

    /// Detect the type of a field value
    fn detect_type(field: &str, auto_detect: bool, pool: &mut StringPool) -> Option<FieldValue> {
        let field = field.trim();

        if field.is_empty() {
            return None;
        }

        // Try number; `NaN` and `inf` stay text
        if auto_detect {
            if let Some(n) = field.parse::<f64>().ok().filter(|n| n.is_finite()) {
                return Some(FieldValue::Number(n));
            }
        }

        // Default to string
        Some(FieldValue::String(pool.intern(field)))
    }
}
