//! Loading entrypoints and implementations.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - picks the parser from the file extension (or you can override via [`LoadOptions`])
//! - parses the first sheet / the CSV body into an in-memory [`crate::types::Table`]
//! - repairs spreadsheet date/time columns (see [`dates`])
//! - optionally reports progress and failures to a [`MetadataObserver`]
//!
//! Format-specific functions are also available under [`csv`] and [`excel`].

pub mod csv;
pub mod dates;
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadStats, MetadataObserver, ReshapeSummary, Severity,
    Stage, TracingObserver,
};
pub use unified::{load_from_path, severity_for_error, InputFormat, LoadOptions};

use crate::types::{Column, Value};

/// Cell contents treated as missing in addition to empty cells.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) fn is_missing_marker(raw: &str) -> bool {
    raw.is_empty() || MISSING_MARKERS.contains(&raw)
}

/// Turn raw header cells into unique column names.
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, ... suffixes.
pub(crate) fn header_names<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = Vec::new();
    for (idx, raw) in raw.into_iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw
        };

        let mut name = base.clone();
        let mut n = 0;
        while names.contains(&name) {
            n += 1;
            name = format!("{base}.{n}");
        }
        names.push(name);
    }
    names
}

/// Settle an all-numeric column on a single numeric tag.
///
/// The column becomes integer when no cell is missing and every value is an integer. With
/// `narrow_whole_floats`, whole floats count as integers (spreadsheets store every number as a
/// float). Otherwise every value is widened to float. Returns `false` (leaving the column
/// untouched) if the column holds anything other than numbers and missing cells, or holds no
/// numbers at all.
pub(crate) fn settle_numeric(column: &mut Column, narrow_whole_floats: bool) -> bool {
    let mut any_number = false;
    let mut any_missing = false;
    let mut all_int = true;
    for value in &column.values {
        match value {
            Value::Missing => any_missing = true,
            Value::Int(_) => any_number = true,
            Value::Float(f) => {
                any_number = true;
                all_int &= narrow_whole_floats && whole_as_i64(*f).is_some();
            }
            _ => return false,
        }
    }
    if !any_number {
        return false;
    }

    let as_int = !any_missing && all_int;
    for value in &mut column.values {
        let settled = match value {
            Value::Int(i) if !as_int => Some(Value::Float(*i as f64)),
            Value::Float(f) if as_int => whole_as_i64(*f).map(Value::Int),
            _ => None,
        };
        if let Some(settled) = settled {
            *value = settled;
        }
    }
    true
}

pub(crate) fn whole_as_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
