use std::fs;
use std::sync::{Arc, Mutex};

use spreadsheet_metadata::ingestion::{
    load_from_path, CompositeObserver, FileObserver, InputFormat, LoadContext, LoadOptions, LoadStats,
    MetadataObserver, Severity, Stage,
};
use spreadsheet_metadata::MetadataError;

#[derive(Default)]
struct RecordingObserver {
    loaded: Mutex<Vec<LoadStats>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl MetadataObserver for RecordingObserver {
    fn on_loaded(&self, _ctx: &LoadContext, stats: LoadStats) {
        self.loaded.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _stage: Stage, severity: Severity, _error: &MetadataError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _stage: Stage, severity: Severity, _error: &MetadataError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_load_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    load_from_path("tests/fixtures/multi_subject.csv", &opts).unwrap();

    assert_eq!(
        *obs.loaded.lock().unwrap(),
        vec![LoadStats { rows: 3, columns: 4 }]
    );
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        format: Some(InputFormat::Csv),
        observer: Some(obs.clone()),
        alert_at_or_above: Severity::Critical,
    };

    // Missing file -> csv io error -> Critical
    let _ = load_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: Severity::Critical,
        ..Default::default()
    };

    // Unsupported extension -> Error severity (not Critical) -> should not alert
    let _ = load_from_path("tests/fixtures/subjects.ods", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_to_file_observer() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.log");

    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        recorder.clone(),
        Arc::new(FileObserver::new(&log_path)),
    ]);
    let opts = LoadOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    load_from_path("tests/fixtures/multi_subject.csv", &opts).unwrap();

    assert_eq!(recorder.loaded.lock().unwrap().len(), 1);
    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("loaded format=Csv"));
    assert!(log.contains("rows=3 columns=4"));
}
