//! CSV loading implementation.

use std::path::Path;

use crate::error::MetadataResult;
use crate::types::{Column, Table, Value};

use super::{header_names, is_missing_marker, settle_numeric};

/// Load a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Records may be shorter or longer than the header; short rows are padded with missing cells.
/// - Blank lines are skipped, but a record of empty fields (`,,`) is a row of missing cells.
/// - Cell text and header names keep their surrounding whitespace.
/// - Column types are inferred per column (see [`load_csv_from_reader`]).
pub fn load_csv_from_path(path: impl AsRef<Path>) -> MetadataResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
///
/// Each column settles on one type: integer, float, boolean, or text. A column holding any value
/// that is not a number keeps its raw strings. Numeric columns are integer only when no cell is
/// missing and every value is written as an integer; otherwise every value is widened to float.
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> MetadataResult<Table> {
    let headers = header_names(rdr.headers()?.iter().map(str::to_owned));

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    let mut table = Table::from_rows(headers, rows);
    for column in &mut table.columns {
        infer_column_type(column);
    }
    Ok(table)
}

fn parse_cell(raw: &str) -> Value {
    if is_missing_marker(raw.trim()) {
        Value::Missing
    } else {
        Value::Text(raw.to_owned())
    }
}

fn infer_column_type(column: &mut Column) {
    if let Some(values) = reparse_column(&column.values, parse_number) {
        let original = std::mem::replace(&mut column.values, values);
        if !settle_numeric(column, false) {
            column.values = original;
        }
        return;
    }
    if let Some(values) = reparse_column(&column.values, parse_bool) {
        column.values = values;
    }
}

fn reparse_column(values: &[Value], parse: fn(&str) -> Option<Value>) -> Option<Vec<Value>> {
    values
        .iter()
        .map(|v| match v {
            Value::Text(s) => parse(s),
            other => Some(other.clone()),
        })
        .collect()
}

fn parse_number(s: &str) -> Option<Value> {
    let s = s.trim();
    s.parse::<i64>()
        .map(Value::Int)
        .or_else(|_| s.parse::<f64>().map(Value::Float))
        .ok()
}

fn parse_bool(s: &str) -> Option<Value> {
    match s {
        "True" | "TRUE" | "true" => Some(Value::Bool(true)),
        "False" | "FALSE" | "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::load_csv_from_reader;
    use crate::types::Value;

    fn load(input: &str) -> crate::types::Table {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes());
        load_csv_from_reader(&mut rdr).unwrap()
    }

    #[test]
    fn integers_and_decimals_keep_their_written_form() {
        let table = load("id,score\n1,2.0\n");
        assert_eq!(table.columns[0].values, vec![Value::Int(1)]);
        assert_eq!(table.columns[1].values, vec![Value::Float(2.0)]);
    }

    #[test]
    fn numeric_column_with_missing_cell_is_widened_to_float() {
        let table = load("id,age\nA,30\nB,\nC,41\n");
        assert_eq!(
            table.columns[1].values,
            vec![Value::Float(30.0), Value::Missing, Value::Float(41.0)]
        );
    }

    #[test]
    fn mixed_column_keeps_raw_text() {
        let table = load("id,code\n1,007\n2,x1\n");
        assert_eq!(
            table.columns[1].values,
            vec![Value::Text("007".into()), Value::Text("x1".into())]
        );
    }

    #[test]
    fn missing_markers_and_empty_records() {
        let table = load("id,note\n1,NA\n,\n\n2,ok\n");
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.columns[0].values,
            vec![Value::Float(1.0), Value::Missing, Value::Float(2.0)]
        );
        assert_eq!(
            table.columns[1].values,
            vec![Value::Missing, Value::Missing, Value::Text("ok".into())]
        );
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        let table = load("id, note \nS1,  padded value \nS2, NA \n");
        assert_eq!(table.columns[1].name, " note ");
        assert_eq!(
            table.columns[1].values,
            vec![Value::Text("  padded value ".into()), Value::Missing]
        );
    }

    #[test]
    fn padded_numbers_still_parse() {
        let table = load("id,age\nA, 30\nB,41 \n");
        assert_eq!(table.columns[1].values, vec![Value::Int(30), Value::Int(41)]);
    }

    #[test]
    fn boolean_columns_are_recognised() {
        let table = load("id,active\n1,True\n2,false\n");
        assert_eq!(
            table.columns[1].values,
            vec![Value::Bool(true), Value::Bool(false)]
        );
    }

    #[test]
    fn short_records_are_padded() {
        let table = load("name,tags\nAlice,x\n,y\n");
        assert_eq!(
            table.columns[0].values,
            vec![Value::Text("Alice".into()), Value::Missing]
        );
        assert!(table.is_rectangular());
    }
}
