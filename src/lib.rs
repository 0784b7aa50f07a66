//! Huginn - sentiment analysis for video comment sections
//!
//! Fetches the public comments of a YouTube video, classifies each one as
//! Positive, Negative or Neutral, and summarizes the result. Comment
//! retrieval sits behind the [`CommentSource`] trait and classification
//! behind [`SentimentClassifier`], so either side can be swapped.
//!
//! Three classification strategies are available:
//! - [`providers::LexiconClassifier`]: rule-based compound score, offline
//! - [`providers::HuggingFaceClassifier`]: hosted inference API (`huggingface` feature)
//! - [`providers::OnnxSentimentClassifier`]: local ONNX model (`local-inference` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::analysis::{AnalysisOptions, analyze};
//! use huginn::providers::LexiconClassifier;
//! use huginn::sources::YtDlpSource;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> huginn::Result<()> {
//!     let options = AnalysisOptions::default();
//!     let source = YtDlpSource::new(options.max_comments);
//!     let classifier = LexiconClassifier::new();
//!
//!     let report = analyze(
//!         "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!         &source,
//!         &classifier,
//!         &options,
//!     )
//!     .await?;
//!
//!     println!("{}", huginn::render::render_report(&report, options.preview_rows));
//!     Ok(())
//! }
//! ```

pub mod analysis;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "local-inference")]
pub mod device;
pub mod error;
pub mod lexicon;
pub mod providers;
pub mod render;
pub mod sources;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{HuginnError, Result};
pub use traits::{CommentSource, CommentStream, SentimentClassifier};
pub use version::{PKG_VERSION, version_string};

#[cfg(feature = "local-inference")]
pub use device::Device;

// Re-export all types
pub use types::{
    AnalysisReport, Classification, Comment, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, RunState,
    SentimentLabel, Summary, VideoRef,
};
