//! In-memory comment source.

use async_trait::async_trait;

use crate::traits::CommentStream;
use crate::{Comment, CommentSource, HuginnError, Result, VideoRef};

/// Serves a fixed list of comments for any video.
///
/// Optionally ends the stream with an error after the comments, which lets
/// callers exercise a fetch that breaks part-way.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    comments: Vec<Comment>,
    failure: Option<String>,
}

impl VecSource {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            comments: texts
                .into_iter()
                .enumerate()
                .map(|(position, text)| Comment::new(text, position))
                .collect(),
            failure: None,
        }
    }

    pub fn from_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            failure: None,
        }
    }

    /// End the stream with a fetch error carrying `message`.
    pub fn fail_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[async_trait]
impl CommentSource for VecSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn comments(&self, _video: &VideoRef) -> Result<CommentStream> {
        let items = self
            .comments
            .clone()
            .into_iter()
            .map(Ok)
            .chain(
                self.failure
                    .clone()
                    .map(|message| Err(HuginnError::FetchFailed(message))),
            );
        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}
