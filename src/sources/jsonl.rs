//! Replay of exported comment dumps.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing::debug;

use crate::traits::CommentStream;
use crate::{Comment, CommentSource, HuginnError, Result, VideoRef};

/// Reads comments from a JSON Lines file, one object per line.
///
/// Each record needs a `text` field; `author` and `votes` are picked up when
/// present and records flagged `"reply": true` are skipped. This matches the
/// output of the common comment downloaders. The file is read lazily, so a
/// consumer that stops early never reads the rest.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Deserialize)]
struct Record {
    text: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    votes: Option<serde_json::Value>,
    #[serde(default)]
    reply: bool,
}

/// Vote counts come either as numbers or as display strings ("1.2K").
fn parse_votes(votes: &serde_json::Value) -> Option<u64> {
    match votes {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => {
            let s = s.trim().replace(',', "");
            let (digits, scale) = match s.chars().last()? {
                'K' | 'k' => (&s[..s.len() - 1], 1_000.0),
                'M' | 'm' => (&s[..s.len() - 1], 1_000_000.0),
                _ => (s.as_str(), 1.0),
            };
            digits.parse::<f64>().ok().map(|v| (v * scale).round() as u64)
        }
        _ => None,
    }
}

#[async_trait]
impl CommentSource for JsonLinesSource {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn comments(&self, video: &VideoRef) -> Result<CommentStream> {
        debug!(path = %self.path.display(), video = %video, "reading comment dump");
        let file = tokio::fs::File::open(&self.path).await?;
        let lines = LinesStream::new(BufReader::new(file).lines());

        let records = lines.filter_map(|line| async move {
            match line {
                Err(e) => Some(Err(HuginnError::Io(e))),
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => match serde_json::from_str::<Record>(&line) {
                    Err(e) => Some(Err(HuginnError::Json(e))),
                    Ok(record) if record.reply => None,
                    Ok(record) => Some(Ok(record)),
                },
            }
        });

        let comments = records.enumerate().map(|(position, record)| {
            record.map(|r| {
                let likes = r.votes.as_ref().and_then(parse_votes);
                Comment {
                    text: r.text,
                    position,
                    author: r.author,
                    likes,
                }
            })
        });

        Ok(Box::pin(comments))
    }
}
