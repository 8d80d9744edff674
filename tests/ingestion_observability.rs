use std::sync::{Arc, Mutex};

use dollar_suite::SuiteError;
use dollar_suite::ingestion::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionOptions, IngestionSeverity, IngestionStats,
    ingest_from_bytes, ingest_from_path,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &SuiteError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &SuiteError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn opts_with(obs: Arc<RecordingObserver>, threshold: IngestionSeverity) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs),
        alert_at_or_above: threshold,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = opts_with(obs.clone(), IngestionSeverity::Critical);

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = opts_with(obs.clone(), IngestionSeverity::Critical);

    // Empty input -> Error severity (not Critical) -> should not alert
    let _ = ingest_from_bytes(b"", "empty.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn observer_reports_fallback_in_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = opts_with(obs.clone(), IngestionSeverity::Critical);

    ingest_from_path("tests/fixtures/carteras.csv", &opts).unwrap();
    ingest_from_path("tests/fixtures/carteras_latin1.csv", &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 2);
    assert!(!successes[0].fallback_used);
    assert_eq!(successes[0].delimiter, b',');
    assert!(successes[1].fallback_used);
    assert_eq!(successes[1].delimiter, b';');
    assert_eq!(successes[1].rows, 3);
}

#[test]
fn composite_observer_fans_out() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn IngestionObserver>, b.clone()]);
    let opts = IngestionOptions {
        observer: Some(Arc::new(composite)),
        alert_at_or_above: IngestionSeverity::Error,
        ..Default::default()
    };

    let _ = ingest_from_bytes(b"", "empty.csv", &opts).unwrap_err();

    for obs in [&a, &b] {
        assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
        assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);
    }
}
