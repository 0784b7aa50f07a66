//! Analysis run lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of a single analysis run.
///
/// `Idle → Fetching → Classifying → Rendered`, with early exits to `Empty`
/// (fetch returned nothing) or `Failed` (missing input or fetch error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Fetching,
    Classifying,
    Rendered,
    Empty,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rendered | Self::Empty | Self::Failed)
    }

    /// Label used for the `outcome` metric dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Classifying => "classifying",
            Self::Rendered => "rendered",
            Self::Empty => "empty",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
