//! Comment fetching through the `yt-dlp` command-line tool.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::MAX_COMMENTS;
use crate::traits::CommentStream;
use crate::{Comment, CommentSource, HuginnError, Result, VideoRef};

/// Executable looked up on `PATH` by default.
pub const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Order in which YouTube returns comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    /// Most popular first.
    #[default]
    Top,
    /// Newest first.
    New,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::New => "new",
        }
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentSort {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "popular" => Ok(Self::Top),
            "new" | "recent" => Ok(Self::New),
            other => Err(HuginnError::Configuration(format!(
                "unknown comment sort '{other}' (expected top or new)"
            ))),
        }
    }
}

/// Fetches top-level comments by running `yt-dlp` and parsing its info JSON.
///
/// The tool is asked for at most `max_comments` comments (never more than
/// [`MAX_COMMENTS`]) so large videos do not download their whole thread;
/// replies are dropped.
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    program: String,
    sort: CommentSort,
    max_comments: usize,
}

impl YtDlpSource {
    pub fn new(max_comments: usize) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            sort: CommentSort::default(),
            max_comments: max_comments.min(MAX_COMMENTS),
        }
    }

    /// Use a different executable (absolute path or name on `PATH`).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn sort(mut self, sort: CommentSort) -> Self {
        self.sort = sort;
        self
    }

    /// Arguments passed to the tool for `video`.
    pub fn args(&self, video: &VideoRef) -> Vec<String> {
        let n = self.max_comments;
        vec![
            "--skip-download".to_string(),
            "--write-comments".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--extractor-args".to_string(),
            // max_comments = total, parents, replies, replies per thread
            format!(
                "youtube:max_comments={n},{n},0,0;comment_sort={}",
                self.sort
            ),
            video.url(),
        ]
    }
}

#[async_trait]
impl CommentSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn comments(&self, video: &VideoRef) -> Result<CommentStream> {
        let args = self.args(video);
        debug!(program = %self.program, video = %video, "running comment extractor");

        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                warn!(program = %self.program, error = %e, "failed to start comment extractor");
                HuginnError::FetchFailed(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                status = ?output.status.code(),
                error = %stderr.trim(),
                "comment extractor failed"
            );
            return Err(HuginnError::FetchFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let comments = parse_info_json(&output.stdout)?;
        debug!(count = comments.len(), "parsed comments");
        Ok(Box::pin(futures_util::stream::iter(
            comments.into_iter().map(Ok),
        )))
    }
}

#[derive(Deserialize)]
struct InfoDocument {
    #[serde(default)]
    comments: Option<Vec<RawComment>>,
}

#[derive(Deserialize)]
struct RawComment {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    parent: Option<String>,
}

/// Extract top-level comments from a `--dump-single-json` document.
///
/// A missing `comments` field means the extractor could not read the
/// comment section (typically disabled comments) and is a fetch failure.
pub(crate) fn parse_info_json(stdout: &[u8]) -> Result<Vec<Comment>> {
    let info: InfoDocument = serde_json::from_slice(stdout)?;
    let comments = info.comments.ok_or_else(|| {
        HuginnError::FetchFailed("comments are unavailable for this video".to_string())
    })?;

    Ok(comments
        .into_iter()
        .filter(|c| c.parent.as_deref().is_none_or(|p| p == "root"))
        .filter_map(|c| {
            let text = c.text?;
            Some((text, c.author, c.like_count))
        })
        .enumerate()
        .map(|(position, (text, author, likes))| Comment {
            text,
            position,
            author,
            likes,
        })
        .collect())
}
