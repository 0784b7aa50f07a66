//! Sentiment classification strategies.
//!
//! The lexicon strategy is always available. The hosted model strategy
//! needs the `huggingface` feature and local ONNX inference needs
//! `local-inference`.

#[cfg(feature = "huggingface")]
pub mod huggingface;
pub mod lexicon;
#[cfg(feature = "local-inference")]
pub mod onnx_sentiment;

#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceClassifier;
pub use lexicon::LexiconClassifier;
#[cfg(feature = "local-inference")]
pub use onnx_sentiment::{LocalSentimentModel, OnnxSentimentClassifier, SentimentModelInfo};
