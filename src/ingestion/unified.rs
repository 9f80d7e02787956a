//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which parses a spreadsheet or CSV file into an
//! in-memory [`crate::types::Table`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`super::observability::MetadataObserver`] is provided, progress, failures and alerts
//!   are reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{MetadataError, MetadataResult};
use crate::types::Table;

use super::observability::{LoadContext, LoadStats, MetadataObserver, Severity, Stage};
use super::{csv, dates, excel};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values.
    Csv,
    /// Excel workbook (`.xls` / `.xlsx`); only the first sheet is read.
    Excel,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xls" | "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling loading and pipeline reporting.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<InputFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn MetadataObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl LoadOptions {
    /// Report a failed stage to the configured observer, raising an alert when the computed
    /// severity meets [`Self::alert_at_or_above`].
    pub fn report_failure(&self, stage: Stage, error: &MetadataError) {
        if let Some(obs) = self.observer.as_ref() {
            let sev = severity_for_error(error);
            obs.on_failure(stage, sev, error);
            if sev >= self.alert_at_or_above {
                obs.on_alert(stage, sev, error);
            }
        }
    }
}

/// Load a spreadsheet or CSV file into a [`Table`].
///
/// - `.csv` is parsed with [`csv::load_csv_from_path`].
/// - `.xls` / `.xlsx` is parsed with [`excel::load_excel_from_path`] (first sheet), then its
///   date/time columns are converted to text by [`dates::repair_datetime_columns`].
/// - Any other extension fails with [`MetadataError::UnsupportedFormat`].
///
/// When an observer is configured, this function reports `on_loaded` (and `on_dates_repaired`
/// when a repair ran) on success, and `on_failure` / `on_alert` on failure.
///
/// # Examples
///
/// ```no_run
/// use spreadsheet_metadata::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), spreadsheet_metadata::MetadataError> {
/// let table = load_from_path("subjects.xlsx", &LoadOptions::default())?;
/// println!("rows={} columns={}", table.row_count(), table.column_count());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> MetadataResult<Table> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path).inspect_err(|e| options.report_failure(Stage::Load, e))?,
    };

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format,
    };

    let result = match format {
        InputFormat::Csv => csv::load_csv_from_path(path),
        InputFormat::Excel => excel::load_excel_from_path(path).map(|mut table| {
            let repaired = dates::repair_datetime_columns(&mut table);
            if !repaired.is_empty() {
                if let Some(obs) = options.observer.as_ref() {
                    obs.on_dates_repaired(&ctx, &repaired);
                }
            }
            table
        }),
    };

    match &result {
        Ok(table) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_loaded(
                    &ctx,
                    LoadStats {
                        rows: table.row_count(),
                        columns: table.column_count(),
                    },
                );
            }
        }
        Err(e) => options.report_failure(Stage::Load, e),
    }

    result
}

/// Classify an error for observer callbacks and alert thresholds.
pub fn severity_for_error(e: &MetadataError) -> Severity {
    match e {
        MetadataError::Io(_) => Severity::Critical,
        MetadataError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        MetadataError::Excel(err) => {
            if error_chain_contains_io(err) {
                Severity::Critical
            } else {
                Severity::Error
            }
        }
        MetadataError::Json(err) if err.is_io() => Severity::Critical,
        MetadataError::Json(_) => Severity::Error,
        MetadataError::UnsupportedFormat { .. }
        | MetadataError::MalformedTable { .. }
        | MetadataError::EmptyTable { .. }
        | MetadataError::Config { .. } => Severity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn infer_format_from_path(path: &Path) -> MetadataResult<InputFormat> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
    InputFormat::from_extension(ext).ok_or_else(|| MetadataError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: ext.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{infer_format_from_path, severity_for_error, InputFormat};
    use crate::error::MetadataError;
    use crate::ingestion::Severity;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(InputFormat::from_extension("csv"), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_extension("XLSX"), Some(InputFormat::Excel));
        assert_eq!(InputFormat::from_extension("xls"), Some(InputFormat::Excel));
        assert_eq!(InputFormat::from_extension("ods"), None);
        assert_eq!(InputFormat::from_extension("json"), None);
    }

    #[test]
    fn unknown_or_missing_extension_is_unsupported() {
        let err = infer_format_from_path(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::UnsupportedFormat { ref extension, .. } if extension == "txt"
        ));

        let err = infer_format_from_path(Path::new("README")).unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedFormat { .. }));
    }

    #[test]
    fn io_errors_are_critical() {
        let io = MetadataError::Io(std::io::Error::other("disk"));
        assert_eq!(severity_for_error(&io), Severity::Critical);

        let empty = MetadataError::EmptyTable {
            column: "subject".into(),
        };
        assert_eq!(severity_for_error(&empty), Severity::Error);
    }
}
