//! Sentiment labels and per-comment classification results.
//!
//! Both classification strategies reduce to the same three-way taxonomy:
//! the lexicon strategy through fixed thresholds on the compound score, the
//! model strategies through substring matching on the model's label name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compound scores at or above this value are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound scores at or below this value are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels in display order.
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Label for a lexicon compound score in `[-1, 1]`.
    ///
    /// NaN is not comparable to either threshold and lands on `Neutral`.
    pub fn from_compound(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Label for a model's label string.
    ///
    /// Case-insensitive substring match: "pos" wins over "neg", anything
    /// unrecognised (e.g. `LABEL_1`, `3 stars`) is `Neutral`.
    pub fn from_model_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("pos") {
            Self::Positive
        } else if lower.contains("neg") {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The comment text that was classified.
    pub text: String,
    /// The assigned label.
    pub label: SentimentLabel,
    /// Strategy-dependent score: compound intensity in `[-1, 1]` for the
    /// lexicon strategy, class probability in `[0, 1]` for model strategies.
    pub score: f64,
}

impl Classification {
    /// Classification from a lexicon compound score.
    pub fn from_compound(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            label: SentimentLabel::from_compound(score),
            score,
        }
    }

    /// Classification from a model label string and its probability.
    pub fn from_model_output(text: impl Into<String>, model_label: &str, score: f64) -> Self {
        Self {
            text: text.into(),
            label: SentimentLabel::from_model_label(model_label),
            score,
        }
    }
}
