//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder; without one, every
//! metric call is a no-op.
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms carry their unit (`_seconds`).

/// Analysis runs by terminal state.
///
/// Labels: `outcome` ("rendered" | "empty" | "failed").
pub const RUNS_TOTAL: &str = "huginn_runs_total";

/// Comments pulled from a source (after truncation).
///
/// Labels: `source`.
pub const COMMENTS_FETCHED_TOTAL: &str = "huginn_comments_fetched_total";

/// Classifications produced.
///
/// Labels: `classifier`, `label` ("Positive" | "Negative" | "Neutral").
pub const CLASSIFICATIONS_TOTAL: &str = "huginn_classifications_total";

/// Time spent classifying one batch.
///
/// Labels: `classifier`.
pub const CLASSIFY_DURATION_SECONDS: &str = "huginn_classify_duration_seconds";
