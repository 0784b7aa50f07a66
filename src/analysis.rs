//! The analysis pipeline: fetch comments for a video, classify them, summarize.

use std::time::Instant;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::telemetry;
use crate::types::{AnalysisReport, Classification, Comment, RunState, VideoRef};
use crate::{CommentSource, HuginnError, Result, SentimentClassifier};

/// Most comments a run ever processes; configured limits are clamped to it.
pub const MAX_COMMENTS: usize = 200;

/// Comments per classifier call unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Rows shown in the preview table unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Knobs for a single analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Stop pulling from the source after this many comments. Values above
    /// [`MAX_COMMENTS`] are clamped.
    pub max_comments: usize,
    /// Comments handed to the classifier per call. Zero is treated as one.
    pub batch_size: usize,
    /// Rows the renderer shows in its preview table.
    pub preview_rows: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_comments: MAX_COMMENTS,
            batch_size: DEFAULT_BATCH_SIZE,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl AnalysisOptions {
    pub fn max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    /// The cap actually applied to the comment stream.
    pub fn comment_limit(&self) -> usize {
        self.max_comments.min(MAX_COMMENTS)
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }
}

/// Run one analysis for the video named by `input`.
///
/// `input` may be a URL in any accepted form or a bare video id. On success
/// the report holds exactly one classification per fetched comment, in fetch
/// order. Errors carry the run's terminal state via
/// [`HuginnError::terminal_state`]; nothing partial is returned.
pub async fn analyze(
    input: &str,
    source: &dyn CommentSource,
    classifier: &dyn SentimentClassifier,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let result = run(input, source, classifier, options).await;

    let outcome = match &result {
        Ok(_) => RunState::Rendered,
        Err(e) => e.terminal_state(),
    };
    metrics::counter!(telemetry::RUNS_TOTAL, "outcome" => outcome.as_str()).increment(1);

    match &result {
        Ok(report) => info!(
            video = %report.video,
            comments = report.results.len(),
            positive = report.summary.positive,
            negative = report.summary.negative,
            neutral = report.summary.neutral,
            "analysis finished"
        ),
        Err(e) => debug!(state = %outcome, error = %e, "analysis ended early"),
    }

    result
}

async fn run(
    input: &str,
    source: &dyn CommentSource,
    classifier: &dyn SentimentClassifier,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let input = input.trim();
    if input.is_empty() {
        return Err(HuginnError::MissingInput);
    }

    let video = VideoRef::parse(input).map_err(fetch_failed)?;
    info!(video = %video, source = source.name(), classifier = classifier.name(), "analysis started");

    debug!(state = %RunState::Fetching, "run state");
    let comments = fetch(&video, source, options.comment_limit()).await?;
    if comments.is_empty() {
        return Err(HuginnError::NoComments);
    }

    debug!(state = %RunState::Classifying, count = comments.len(), "run state");
    let results = classify(&comments, classifier, options.batch_size.max(1)).await?;

    Ok(AnalysisReport::new(video, classifier.name(), results))
}

/// Pull up to `limit` comments; the stream is dropped once the cap is hit.
async fn fetch(video: &VideoRef, source: &dyn CommentSource, limit: usize) -> Result<Vec<Comment>> {
    let stream = source.comments(video).await.map_err(fetch_failed)?;
    let mut stream = stream.take(limit);

    let mut comments = Vec::new();
    while let Some(item) = stream.next().await {
        comments.push(item.map_err(fetch_failed)?);
    }

    metrics::counter!(telemetry::COMMENTS_FETCHED_TOTAL, "source" => source.name().to_owned())
        .increment(comments.len() as u64);
    debug!(count = comments.len(), source = source.name(), "fetched comments");
    Ok(comments)
}

/// Classify in sequential chunks of `batch_size`, keeping input order.
async fn classify(
    comments: &[Comment],
    classifier: &dyn SentimentClassifier,
    batch_size: usize,
) -> Result<Vec<Classification>> {
    let mut results = Vec::with_capacity(comments.len());

    for chunk in comments.chunks(batch_size) {
        let texts: Vec<&str> = chunk.iter().map(|c| c.text.as_str()).collect();
        let start = Instant::now();
        let batch = classifier.classify_batch(&texts).await?;
        metrics::histogram!(telemetry::CLASSIFY_DURATION_SECONDS,
            "classifier" => classifier.name().to_owned(),
        )
        .record(start.elapsed().as_secs_f64());

        if batch.len() != chunk.len() {
            return Err(HuginnError::DataError(format!(
                "classifier returned {} results for {} comments",
                batch.len(),
                chunk.len()
            )));
        }

        for classification in &batch {
            metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL,
                "classifier" => classifier.name().to_owned(),
                "label" => classification.label.as_str(),
            )
            .increment(1);
        }
        debug!(batch = chunk.len(), done = results.len() + batch.len(), "classified batch");
        results.extend(batch);
    }

    Ok(results)
}

/// Collapse any error met while resolving or fetching into `FetchFailed`.
fn fetch_failed(error: HuginnError) -> HuginnError {
    warn!(error = %error, "comment fetch failed");
    match error {
        HuginnError::FetchFailed(_) => error,
        other => HuginnError::FetchFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = AnalysisOptions::default();
        assert_eq!(options.max_comments, 200);
        assert_eq!(options.batch_size, 16);
        assert_eq!(options.preview_rows, 20);
    }

    #[test]
    fn comment_limit_never_exceeds_ceiling() {
        assert_eq!(AnalysisOptions::default().comment_limit(), 200);
        assert_eq!(AnalysisOptions::default().max_comments(50).comment_limit(), 50);
        assert_eq!(AnalysisOptions::default().max_comments(500).comment_limit(), 200);
    }

    #[test]
    fn fetch_failed_wraps_other_errors() {
        let wrapped = fetch_failed(HuginnError::InvalidInput("bad url".into()));
        assert!(matches!(wrapped, HuginnError::FetchFailed(ref m) if m.contains("bad url")));

        let kept = fetch_failed(HuginnError::FetchFailed("timeout".into()));
        assert!(matches!(kept, HuginnError::FetchFailed(ref m) if m == "timeout"));
    }
}
