//! Result of a completed analysis run.

use serde::{Deserialize, Serialize};

use super::{Classification, Summary, VideoRef};

/// Classifications for one video plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// The analysed video.
    pub video: VideoRef,
    /// Name of the classifier that produced the results.
    pub classifier: String,
    /// One entry per fetched comment, in fetch order.
    pub results: Vec<Classification>,
    /// Label counts over `results`.
    pub summary: Summary,
}

impl AnalysisReport {
    pub fn new(video: VideoRef, classifier: impl Into<String>, results: Vec<Classification>) -> Self {
        let summary = Summary::from_results(&results);
        Self {
            video,
            classifier: classifier.into(),
            results,
            summary,
        }
    }

    /// The first `rows` results.
    pub fn preview(&self, rows: usize) -> &[Classification] {
        &self.results[..rows.min(self.results.len())]
    }
}
