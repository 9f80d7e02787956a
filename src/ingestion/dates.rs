//! Date/time column repair for spreadsheet input.
//!
//! Spreadsheet parsers hand back calendar cells as timestamps and there is no switch to keep
//! them as the text the author typed. Metadata values must be plain text, so every date/time
//! column is rendered to text after parsing, with empty date cells folded into the ordinary
//! [`Value::Missing`] marker.

use tracing::info;

use crate::types::{datetime_text_format, Table, Value, DATE_TEXT_FORMAT};

/// Render every date/time column of `table` as text, in place.
///
/// A column qualifies when it holds at least one timestamp and nothing else besides missing
/// cells (see [`crate::types::Column::is_datetime`]). Columns whose timestamps all fall on
/// midnight render as `YYYY-MM-DD`, others as `YYYY-MM-DD HH:MM:SS`, with microseconds
/// appended across the column when any timestamp has a sub-second part. Missing cells stay
/// [`Value::Missing`].
///
/// Returns the names of the repaired columns; an empty list means the table was not touched.
pub fn repair_datetime_columns(table: &mut Table) -> Vec<String> {
    let mut repaired = Vec::new();
    for column in &mut table.columns {
        if !column.is_datetime() {
            continue;
        }
        let format = if column.all_midnight() {
            DATE_TEXT_FORMAT
        } else {
            datetime_text_format(column.any_sub_second())
        };
        for value in &mut column.values {
            *value = match value {
                Value::DateTime(dt) => Value::Text(dt.format(format).to_string()),
                _ => Value::Missing,
            };
        }
        repaired.push(column.name.clone());
    }
    if !repaired.is_empty() {
        info!(columns = ?repaired, "repaired date columns");
    }
    repaired
}
