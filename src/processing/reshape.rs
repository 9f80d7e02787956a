//! Table-to-metadata reshaping.
//!
//! The first column names the subject. Its non-missing count picks the output layout:
//!
//! - exactly one subject: a flat map of column name to scalar text, or to a list of raw values
//!   when the column holds more than one value
//! - several subjects: a map of subject key to the full row as text

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{MetadataError, MetadataResult};
use crate::types::{Column, Table, Value};

use super::normalize::normalize;

/// Which reshaping branch produced a [`SubjectInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectShape {
    /// One subject; columns map to scalars or lists.
    Single,
    /// Several subjects; subject keys map to rows.
    Multiple,
}

/// A single-subject field: normalized text, or every non-missing value of a multi-valued column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    /// Normalized text of the first row's cell.
    Scalar(String),
    /// Raw non-missing values in row order. These are not normalized.
    List(Vec<Value>),
}

/// Subject metadata produced by [`reshape`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubjectInfo {
    /// Column name to field value.
    Single(BTreeMap<String, InfoValue>),
    /// Subject key to (column name to text).
    Multiple(BTreeMap<String, BTreeMap<String, String>>),
}

impl SubjectInfo {
    /// Which branch produced this metadata.
    pub fn shape(&self) -> SubjectShape {
        match self {
            SubjectInfo::Single(_) => SubjectShape::Single,
            SubjectInfo::Multiple(_) => SubjectShape::Multiple,
        }
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match self {
            SubjectInfo::Single(fields) => fields.len(),
            SubjectInfo::Multiple(subjects) => subjects.len(),
        }
    }

    /// Returns `true` when there are no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Count the non-missing values of the subject (first) column.
///
/// Fails with [`MetadataError::MalformedTable`] when the table has no columns or its columns
/// differ in length, since no meaningful count exists then.
pub fn subject_count(table: &Table) -> MetadataResult<usize> {
    let subject = subject_column(table)?;
    Ok(subject.non_missing_count())
}

/// Reshape `table` into subject metadata.
///
/// - No subjects: [`MetadataError::EmptyTable`].
/// - One subject: [`SubjectInfo::Single`]. Columns with more than one non-missing value become
///   [`InfoValue::List`] of the raw values; all others take the row-0 cell through
///   [`normalize`].
/// - Several subjects: [`SubjectInfo::Multiple`], every cell rendered with
///   [`Value::to_text`]. Rows sharing a subject key overwrite earlier ones (last write wins).
///   Rows with a missing subject cell are skipped.
pub fn reshape(table: &Table) -> MetadataResult<SubjectInfo> {
    let subject = subject_column(table)?;
    match subject.non_missing_count() {
        0 => Err(MetadataError::EmptyTable {
            column: subject.name.clone(),
        }),
        1 => {
            tracing::debug!(column = %subject.name, "processing single subject");
            Ok(SubjectInfo::Single(reshape_single(table)))
        }
        n => {
            tracing::debug!(column = %subject.name, subjects = n, "processing multiple subjects");
            Ok(SubjectInfo::Multiple(reshape_multiple(subject, table)))
        }
    }
}

fn subject_column(table: &Table) -> MetadataResult<&Column> {
    let subject = table
        .columns
        .first()
        .ok_or_else(|| MetadataError::MalformedTable {
            message: "table has no columns".to_string(),
        })?;
    if !table.is_rectangular() {
        return Err(MetadataError::MalformedTable {
            message: format!(
                "columns differ in length (subject column '{}' has {} rows)",
                subject.name,
                subject.values.len()
            ),
        });
    }
    Ok(subject)
}

fn reshape_single(table: &Table) -> BTreeMap<String, InfoValue> {
    table
        .columns
        .iter()
        .map(|column| {
            let value = if column.non_missing_count() > 1 {
                InfoValue::List(column.non_missing().cloned().collect())
            } else {
                InfoValue::Scalar(column.values.first().map(normalize).unwrap_or_default())
            };
            (column.name.clone(), value)
        })
        .collect()
}

fn reshape_multiple(subject: &Column, table: &Table) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut subjects = BTreeMap::new();
    let mut skipped = 0usize;
    for (row, key) in subject.values.iter().enumerate() {
        if key.is_missing() {
            skipped += 1;
            continue;
        }
        let record: BTreeMap<String, String> = table
            .columns
            .iter()
            .map(|column| (column.name.clone(), column.values[row].to_text()))
            .collect();
        subjects.insert(key.to_text(), record);
    }
    if skipped > 0 {
        tracing::warn!(column = %subject.name, skipped, "skipped rows without a subject value");
    }
    subjects
}
