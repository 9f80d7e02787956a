//! Core data model: typed cell [`Value`]s arranged into named [`Column`]s of a [`Table`].
//!
//! Cell tags are decided once, while the input file is parsed; everything downstream
//! (date repair, normalization, reshaping) dispatches on the tag with a `match`.

use chrono::{NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

/// Format used when rendering a single timestamp as text.
pub const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for timestamps that carry sub-second precision.
pub const DATETIME_FRACTION_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format used for timestamps in a date column whose values all fall on midnight.
pub const DATE_TEXT_FORMAT: &str = "%Y-%m-%d";

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent cell. This is the one missing-value marker used after loading.
    Missing,
    /// UTF-8 text.
    Text(String),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Calendar date and time (spreadsheets only).
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns `true` for [`Value::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Textual representation of the value.
    ///
    /// Floats always carry a fractional part (`2.0`, `5.25`), which is what
    /// [`crate::processing::normalize`] later strips from whole numbers. Booleans render as
    /// `True` / `False`. Missing renders as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Text(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_text(*f),
            Value::Bool(b) => bool_text(*b).to_owned(),
            Value::DateTime(dt) => dt.format(datetime_text_format(dt.nanosecond() != 0)).to_string(),
        }
    }
}

/// Text form of a boolean cell.
pub fn bool_text(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Timestamp format, with microseconds when `sub_second` is set.
pub fn datetime_text_format(sub_second: bool) -> &'static str {
    if sub_second {
        DATETIME_FRACTION_TEXT_FORMAT
    } else {
        DATETIME_TEXT_FORMAT
    }
}

fn float_text(f: f64) -> String {
    let s = f.to_string();
    if f.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::DateTime(_) => serializer.serialize_str(&self.to_text()),
        }
    }
}

/// A named column of values, aligned by row index with the other columns of its [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within the table.
    pub name: String,
    /// Values in source row order.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of values that are not [`Value::Missing`].
    pub fn non_missing_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }

    /// Iterate non-missing values in row order.
    pub fn non_missing(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }

    /// A date/time column holds at least one timestamp and nothing else besides missing cells.
    pub fn is_datetime(&self) -> bool {
        let mut saw_datetime = false;
        for v in self.non_missing() {
            match v {
                Value::DateTime(_) => saw_datetime = true,
                _ => return false,
            }
        }
        saw_datetime
    }

    /// Returns `true` when some timestamp in the column has a sub-second part.
    pub(crate) fn any_sub_second(&self) -> bool {
        self.values
            .iter()
            .any(|v| matches!(v, Value::DateTime(dt) if dt.nanosecond() != 0))
    }

    /// Returns `true` when every timestamp in the column is exactly at midnight.
    pub(crate) fn all_midnight(&self) -> bool {
        self.values.iter().all(|v| match v {
            Value::DateTime(dt) => dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0,
            _ => true,
        })
    }
}

/// In-memory table: an ordered list of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Columns in source order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build a table from a header row and row-major values.
    ///
    /// Short rows are padded with [`Value::Missing`]; cells beyond the header width are dropped.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.values.push(cells.next().unwrap_or(Value::Missing));
            }
        }

        Self { columns }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, taken from the first column (0 for a table without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Returns the column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `true` when every column has the same number of values.
    pub fn is_rectangular(&self) -> bool {
        let rows = self.row_count();
        self.columns.iter().all(|c| c.values.len() == rows)
    }
}
