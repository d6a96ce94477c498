//! File round trips through the CSV reader and writer

use pretty_assertions::assert_eq;
use std::io::Write;
use tabcalc_core::{FieldValue, Row};
use tabcalc_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use tempfile::NamedTempFile;

#[test]
fn test_file_roundtrip() {
    let mut input = NamedTempFile::new().unwrap();
    write!(input, "time,Density,Note\n0,3,start\n1,6,\n2,9,end\n").unwrap();

    let mut table = CsvReader::read_file(input.path(), &CsvReadOptions::default()).unwrap();
    assert_eq!(table.len(), 3);

    table.push_row(Row::new().with_field("time", 3).with_field("Note", "late"));

    let output = NamedTempFile::new().unwrap();
    CsvWriter::write_file(&table, output.path(), &CsvWriteOptions::default()).unwrap();

    let written = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(
        written,
        "time,Density,Note\n0,3,start\n1,6,\n2,9,end\n3,,late\n"
    );

    let reread = CsvReader::read_file(output.path(), &CsvReadOptions::default()).unwrap();
    assert_eq!(reread.columns(), table.columns());
    assert_eq!(
        reread.row(3).unwrap().get("Note").unwrap().value,
        FieldValue::string("late")
    );
    assert!(reread.row(3).unwrap().get("Density").is_none());
}

#[test]
fn test_missing_file() {
    let result = CsvReader::read_file("/nonexistent/input.csv", &CsvReadOptions::default());
    assert!(matches!(result, Err(tabcalc_csv::CsvError::Io(_))));
}
