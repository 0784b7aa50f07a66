//! Core traits: where comments come from and how they are classified.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::{Classification, Comment, Result, VideoRef};

/// Lazy, finite, non-restartable sequence of comments.
pub type CommentStream = Pin<Box<dyn Stream<Item = Result<Comment>> + Send>>;

/// Maps comment text to a sentiment label and score.
///
/// Implementations are constructed once and shared immutably across runs;
/// any interior state (e.g. an inference session) is theirs to guard.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classifier name for logging and reports.
    fn name(&self) -> &str;

    /// Classify a single text.
    async fn classify(&self, text: &str) -> Result<Classification>;

    /// Classify several texts, preserving order.
    ///
    /// Default implementation calls `classify` sequentially.
    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Classification>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}

/// Produces the public comments of a video.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Open the comment sequence for `video`.
    ///
    /// Errors may surface either here or as items of the stream; callers
    /// treat both as a failed fetch.
    async fn comments(&self, video: &VideoRef) -> Result<CommentStream>;
}
