use std::path::Path;

use calamine::{open_workbook_auto, CellErrorType, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{MetadataError, MetadataResult};
use crate::types::{bool_text, Column, Table, Value, DATETIME_TEXT_FORMAT};

use super::{header_names, is_missing_marker, settle_numeric, whole_as_i64};

/// Load the first sheet of a spreadsheet (`.xlsx`, `.xls`) into an in-memory [`Table`].
///
/// Behavior:
/// - Only the first sheet in workbook order is read
/// - The first non-empty row is the header row
/// - Entirely blank rows below the header are skipped
/// - Date/time cells are kept as [`Value::DateTime`]; callers normally follow up with
///   [`super::dates::repair_datetime_columns`]
pub fn load_excel_from_path(path: impl AsRef<Path>) -> MetadataResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MetadataError::MalformedTable {
            message: "workbook has no sheets".to_string(),
        })??;
    Ok(table_from_range(&range))
}

/// Convert a sheet range into a [`Table`].
///
/// Numeric columns settle on integer when every value is whole and no cell is missing,
/// otherwise on float. Columns mixing numbers with other cells keep per-cell tags, with whole
/// floats narrowed to integers.
pub fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let headers = match rows.next() {
        Some(header) => header_names(header.iter().map(cell_to_header_string)),
        None => return Table::default(),
    };

    let body: Vec<Vec<Value>> = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|v| !v.is_missing()))
        .collect();

    let mut table = Table::from_rows(headers, body);
    for column in &mut table.columns {
        if !settle_numeric(column, true) {
            narrow_whole_floats(column);
        }
    }
    table
}

fn narrow_whole_floats(column: &mut Column) {
    for value in &mut column.values {
        if let Value::Float(f) = value {
            if let Some(i) = whole_as_i64(*f) {
                *value = Value::Int(i);
            }
        }
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => match whole_as_i64(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        Data::Bool(b) => bool_text(*b).to_owned(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.format(DATETIME_TEXT_FORMAT).to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => error_text(e).unwrap_or_default(),
        Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Missing,
        Data::Error(e) => error_text(e).map_or(Value::Missing, Value::Text),
        Data::String(s) if is_missing_marker(s.trim()) => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        // Durations carry a day count rather than a calendar position.
        Data::DateTime(dt) if dt.is_duration() => Value::Float(dt.as_f64()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Value::Float(dt.as_f64()), Value::DateTime),
        Data::DateTimeIso(s) => parse_iso_datetime(s).map_or_else(|| Value::Text(s.clone()), Value::DateTime),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

/// Spreadsheet error cells keep their display text (`#DIV/0!`) unless it is a missing marker.
fn error_text(e: &CellErrorType) -> Option<String> {
    let text = e.to_string();
    (!is_missing_marker(&text)).then_some(text)
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use calamine::{CellErrorType, Data, Range};

    use super::{parse_iso_datetime, table_from_range};
    use crate::types::Value;

    fn range(cells: Vec<Vec<Data>>) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    #[test]
    fn whole_floats_become_integers() {
        let table = table_from_range(&range(vec![
            vec![Data::String("id".into()), Data::String("score".into())],
            vec![Data::Float(1.0), Data::Float(2.5)],
            vec![Data::Float(2.0), Data::Float(3.0)],
        ]));
        assert_eq!(table.columns[0].values, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(
            table.columns[1].values,
            vec![Value::Float(2.5), Value::Float(3.0)]
        );
    }

    #[test]
    fn empty_and_error_cells_are_missing() {
        let table = table_from_range(&range(vec![
            vec![Data::String("name".into()), Data::String("tags".into())],
            vec![Data::String("Alice".into()), Data::String("x".into())],
            vec![Data::Empty, Data::Error(calamine::CellErrorType::NA)],
            vec![Data::Empty, Data::String("y".into())],
        ]));
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.columns[1].values,
            vec![Value::Text("x".into()), Value::Text("y".into())]
        );
    }

    #[test]
    fn non_missing_error_cells_keep_their_text() {
        let table = table_from_range(&range(vec![
            vec![Data::String("subject".into()), Data::String("ratio".into())],
            vec![Data::String("S01".into()), Data::Error(CellErrorType::Ref)],
            vec![Data::Error(CellErrorType::Div0), Data::Error(CellErrorType::Value)],
        ]));
        assert_eq!(
            table.columns[0].values,
            vec![Value::Text("S01".into()), Value::Text("#DIV/0!".into())]
        );
        assert_eq!(table.columns[0].non_missing_count(), 2);
        assert_eq!(
            table.columns[1].values,
            vec![Value::Text("#REF!".into()), Value::Text("#VALUE!".into())]
        );
    }

    #[test]
    fn mixed_columns_keep_cell_tags() {
        let table = table_from_range(&range(vec![
            vec![Data::String("code".into())],
            vec![Data::Float(7.0)],
            vec![Data::String("x1".into())],
        ]));
        assert_eq!(
            table.columns[0].values,
            vec![Value::Int(7), Value::Text("x1".into())]
        );
    }

    #[test]
    fn iso_datetimes_parse_with_and_without_time() {
        assert!(parse_iso_datetime("2024-01-15T08:30:00").is_some());
        assert!(parse_iso_datetime("2024-01-15").is_some());
        assert!(parse_iso_datetime("not a date").is_none());
    }
}
