//! Video references parsed from user input.
//!
//! User-pasted links are untrusted: only YouTube hosts are accepted and the
//! video id must be exactly 11 characters of `[A-Za-z0-9_-]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{HuginnError, Result};

const VIDEO_ID_LEN: usize = 11;

/// A validated reference to a single video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoRef {
    id: String,
}

impl VideoRef {
    /// Parse a watch/short/embed/live link or a bare video id.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(HuginnError::InvalidInput("empty video reference".to_string()));
        }

        if is_valid_id(input) {
            return Ok(Self {
                id: input.to_string(),
            });
        }

        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{input}")
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| HuginnError::InvalidInput(format!("not a URL: {e}")))?;

        let host = url
            .host_str()
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| HuginnError::InvalidInput("URL has no host".to_string()))?;
        let host = ["www.", "m.", "music."]
            .iter()
            .find_map(|prefix| host.strip_prefix(*prefix))
            .unwrap_or(host.as_str());

        let id = match host {
            "youtu.be" => url
                .path_segments()
                .and_then(|mut segments| segments.next())
                .map(str::to_string),
            "youtube.com" | "youtube-nocookie.com" => id_from_youtube_path(&url),
            other => {
                return Err(HuginnError::InvalidInput(format!(
                    "unsupported host: {other}"
                )));
            }
        };

        match id {
            Some(id) if is_valid_id(&id) => Ok(Self { id }),
            Some(id) => Err(HuginnError::InvalidInput(format!("malformed video id: {id}"))),
            None => Err(HuginnError::InvalidInput(
                "no video id in URL".to_string(),
            )),
        }
    }

    /// The 11-character video id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical watch URL.
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

impl FromStr for VideoRef {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn id_from_youtube_path(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    match segments.next()? {
        "watch" => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        "shorts" | "embed" | "live" | "v" => segments.next().map(str::to_string),
        _ => None,
    }
}

fn is_valid_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
