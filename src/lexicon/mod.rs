//! Lexicon-based sentiment scoring.
//!
//! A port of the VADER heuristics (Hutto & Gilbert, 2014) over a pluggable
//! valence lexicon. The crate ships a few hundred of the most frequent
//! VADER entries plus emoji; point [`Lexicon::from_path`] at the upstream
//! `vader_lexicon.txt` for full coverage.

mod analyzer;
mod rules;
mod table;

pub use analyzer::{PolarityScores, SentimentIntensityAnalyzer};
pub use table::Lexicon;
