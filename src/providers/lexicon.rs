//! Lexicon strategy: VADER compound score with fixed thresholds.

use std::path::Path;

use async_trait::async_trait;

use crate::lexicon::{Lexicon, SentimentIntensityAnalyzer};
use crate::{Classification, Result, SentimentClassifier};

/// Classifies one comment at a time from its compound score.
///
/// Deterministic and stateless; the score stored in the result is the
/// compound value in `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier {
    analyzer: SentimentIntensityAnalyzer,
}

impl LexiconClassifier {
    /// Classifier over the built-in lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::with_lexicon(lexicon),
        }
    }

    /// Classifier over a VADER-format lexicon file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_lexicon(Lexicon::from_path(path)?))
    }

    pub fn analyzer(&self) -> &SentimentIntensityAnalyzer {
        &self.analyzer
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        let scores = self.analyzer.polarity_scores(text);
        Ok(Classification::from_compound(text, scores.compound))
    }
}
