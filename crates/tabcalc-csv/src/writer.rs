//! CSV writer

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use log::debug;
use tabcalc_core::{Row, Table};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        table: &Table,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let path = path.as_ref();
        debug!("Writing CSV to {}", path.display());
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a table to a writer
    ///
    /// One record per row with a cell per declared column. Error fields are
    /// written as their message, missing fields as empty cells.
    pub fn write<W: Write>(table: &Table, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(table.columns())?;
        }

        for row in table.rows() {
            csv_writer.write_record(Self::record(table.columns(), row))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Cells of one row, in column order
    ///
    /// A name declared twice (a derived column added twice) takes the n-th
    /// field of that name on its n-th occurrence.
    fn record(columns: &[String], row: &Row) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        columns
            .iter()
            .map(|column| {
                let nth = seen.entry(column.as_str()).or_insert(0);
                let cell = row
                    .get_nth(column, *nth)
                    .map(|field| field.value.to_string())
                    .unwrap_or_default();
                *nth += 1;
                cell
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcalc_core::FieldError;

    fn write_to_string(table: &Table, options: &CsvWriteOptions) -> String {
        let mut buf = Vec::new();
        CsvWriter::write(table, &mut buf, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_values() {
        let mut table = Table::with_columns(["time", "Rate"]).unwrap();
        table.push_row(Row::new().with_field("time", 0).with_field(
            "Rate",
            FieldError::missing("Density"),
        ));
        table.push_row(Row::new().with_field("time", 1.5).with_field("Rate", "null"));
        table.push_row(Row::new().with_field("Rate", 3));

        let out = write_to_string(&table, &CsvWriteOptions::default());
        assert_eq!(
            out,
            "time,Rate\n0,Missing operand: Density\n1.5,null\n,3\n"
        );
    }

    #[test]
    fn test_write_repeated_column() {
        let mut table = Table::with_columns(["x"]).unwrap();
        table.push_row(Row::new().with_field("x", 1).with_field("y", 2).with_field("y", 3));
        table.push_column("y");
        table.push_column("y");

        let options = CsvWriteOptions {
            write_header: false,
            ..Default::default()
        };
        assert_eq!(write_to_string(&table, &options), "1,2,3\n");
    }

    #[test]
    fn test_write_crlf_and_delimiter() {
        let mut table = Table::with_columns(["a", "b"]).unwrap();
        table.push_row(Row::new().with_field("a", 1).with_field("b", "x;y"));

        let options = CsvWriteOptions::default()
            .with_delimiter(b';')
            .with_line_terminator(LineTerminator::CRLF);
        assert_eq!(write_to_string(&table, &options), "a;b\r\n1;\"x;y\"\r\n");
    }
}
