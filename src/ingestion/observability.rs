use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::MetadataError;
use crate::processing::SubjectShape;

use super::unified::InputFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the run stops).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Pipeline stage a failure was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and parsing the input file.
    Load,
    /// Turning the table into subject metadata.
    Reshape,
    /// Serializing and writing the metadata document.
    Write,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The input path.
    pub path: PathBuf,
    /// Format used for parsing.
    pub format: InputFormat,
}

/// Minimal stats reported after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of data rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// Outcome of reshaping a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshapeSummary {
    /// Which branch produced the metadata.
    pub shape: SubjectShape,
    /// Number of top-level entries (columns for one subject, subjects otherwise).
    pub entries: usize,
}

/// Observer interface for pipeline progress and failures.
///
/// Every method has a no-op default so implementors only override what they record.
pub trait MetadataObserver: Send + Sync {
    /// Called when the input file has been parsed.
    fn on_loaded(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when date/time columns were converted to text.
    fn on_dates_repaired(&self, _ctx: &LoadContext, _columns: &[String]) {}

    /// Called when the table has been reshaped into subject metadata.
    fn on_reshaped(&self, _summary: ReshapeSummary) {}

    /// Called once the metadata document has been written.
    fn on_written(&self, _path: &Path) {}

    /// Called when a stage fails.
    fn on_failure(&self, _stage: Stage, _severity: Severity, _error: &MetadataError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        self.on_failure(stage, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn MetadataObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn MetadataObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl MetadataObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_dates_repaired(&self, ctx: &LoadContext, columns: &[String]) {
        for o in &self.observers {
            o.on_dates_repaired(ctx, columns);
        }
    }

    fn on_reshaped(&self, summary: ReshapeSummary) {
        for o in &self.observers {
            o.on_reshaped(summary);
        }
    }

    fn on_written(&self, path: &Path) {
        for o in &self.observers {
            o.on_written(path);
        }
    }

    fn on_failure(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        for o in &self.observers {
            o.on_failure(stage, severity, error);
        }
    }

    fn on_alert(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        for o in &self.observers {
            o.on_alert(stage, severity, error);
        }
    }
}

/// Emits pipeline events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl MetadataObserver for TracingObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            format = ?ctx.format,
            path = %ctx.path.display(),
            rows = stats.rows,
            columns = stats.columns,
            "loaded input table"
        );
    }

    fn on_dates_repaired(&self, ctx: &LoadContext, columns: &[String]) {
        tracing::info!(
            path = %ctx.path.display(),
            columns = ?columns,
            "converted date/time columns to text"
        );
    }

    fn on_reshaped(&self, summary: ReshapeSummary) {
        tracing::info!(shape = ?summary.shape, entries = summary.entries, "reshaped subject metadata");
    }

    fn on_written(&self, path: &Path) {
        tracing::info!(path = %path.display(), "wrote metadata document");
    }

    fn on_failure(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        match severity {
            Severity::Info => tracing::info!(?stage, %error, "stage failed"),
            Severity::Warning => tracing::warn!(?stage, %error, "stage failed"),
            Severity::Error | Severity::Critical => {
                tracing::error!(?stage, ?severity, %error, "stage failed")
            }
        }
    }

    fn on_alert(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        tracing::error!(alert = true, ?stage, ?severity, %error, "stage failed");
    }
}

/// Appends pipeline events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", Utc::now().format("%Y-%m-%dT%H:%M:%SZ"));
        }
    }
}

impl MetadataObserver for FileObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "loaded format={:?} path={} rows={} columns={}",
            ctx.format,
            ctx.path.display(),
            stats.rows,
            stats.columns
        ));
    }

    fn on_dates_repaired(&self, ctx: &LoadContext, columns: &[String]) {
        self.append_line(&format!(
            "dates-repaired path={} columns={}",
            ctx.path.display(),
            columns.join(",")
        ));
    }

    fn on_reshaped(&self, summary: ReshapeSummary) {
        self.append_line(&format!(
            "reshaped shape={:?} entries={}",
            summary.shape, summary.entries
        ));
    }

    fn on_written(&self, path: &Path) {
        self.append_line(&format!("written path={}", path.display()));
    }

    fn on_failure(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        self.append_line(&format!(
            "fail stage={stage:?} severity={severity:?} err={error}"
        ));
    }

    fn on_alert(&self, stage: Stage, severity: Severity, error: &MetadataError) {
        self.append_line(&format!(
            "ALERT stage={stage:?} severity={severity:?} err={error}"
        ));
    }
}
