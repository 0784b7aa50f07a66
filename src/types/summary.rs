//! Label counts over a set of classifications.

use serde::{Deserialize, Serialize};

use super::{Classification, SentimentLabel};

/// Count of classifications per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl Summary {
    /// Tally the labels of `results`.
    pub fn from_results(results: &[Classification]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result.label);
        }
        summary
    }

    /// Add one occurrence of `label`.
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of `label` in `[0, 1]`; zero for an empty summary.
    pub fn fraction(&self, label: SentimentLabel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(label) as f64 / total as f64,
        }
    }

    /// `(label, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL
            .into_iter()
            .map(|label| (label, self.count(label)))
    }

    /// The most frequent label; ties resolve in display order.
    pub fn dominant(&self) -> Option<SentimentLabel> {
        if self.total() == 0 {
            return None;
        }
        let mut best = SentimentLabel::Positive;
        for (label, count) in self.iter() {
            if count > self.count(best) {
                best = label;
            }
        }
        Some(best)
    }
}
