//! Tests for metrics emitted by the analysis pipeline.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use huginn::analysis::{AnalysisOptions, analyze};
use huginn::providers::LexiconClassifier;
use huginn::sources::VecSource;
use huginn::telemetry;

const VIDEO: &str = "dQw4w9WgXcQ";

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for a metric name carrying the given label pair.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: (&str, &str)) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label.0 && l.value() == label.1)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_run_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let source = VecSource::new(["I love this!", "This is terrible", "Posted on Monday"]);
                let classifier = LexiconClassifier::new();
                analyze(VIDEO, &source, &classifier, &AnalysisOptions::default()).await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::RUNS_TOTAL, ("outcome", "rendered")),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::COMMENTS_FETCHED_TOTAL), 3);
    assert_eq!(counter_total(&snapshot, telemetry::CLASSIFICATIONS_TOTAL), 3);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CLASSIFICATIONS_TOTAL, ("label", "Positive")),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CLASSIFICATIONS_TOTAL, ("label", "Negative")),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::CLASSIFY_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn empty_run_records_empty_outcome() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let _result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let source = VecSource::default();
                let classifier = LexiconClassifier::new();
                analyze(VIDEO, &source, &classifier, &AnalysisOptions::default()).await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::RUNS_TOTAL, ("outcome", "empty")),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CLASSIFICATIONS_TOTAL), 0);
    assert!(!has_histogram(&snapshot, telemetry::CLASSIFY_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_run_records_failed_outcome() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let _result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let source = VecSource::new(["one"]).fail_with("timeout");
                let classifier = LexiconClassifier::new();
                analyze(VIDEO, &source, &classifier, &AnalysisOptions::default()).await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::RUNS_TOTAL, ("outcome", "failed")),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::COMMENTS_FETCHED_TOTAL), 0);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let source = VecSource::new(["great"]);
    let classifier = LexiconClassifier::new();
    let _report = analyze(VIDEO, &source, &classifier, &AnalysisOptions::default())
        .await
        .unwrap();
}
