//! Data types shared by sources, classifiers and the analysis pipeline.

mod comment;
mod report;
mod run;
mod sentiment;
mod summary;
mod video;

pub use comment::Comment;
pub use report::AnalysisReport;
pub use run::RunState;
pub use sentiment::{Classification, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, SentimentLabel};
pub use summary::Summary;
pub use video::VideoRef;
