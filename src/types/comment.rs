//! Fetched comment.

use serde::{Deserialize, Serialize};

/// A single public comment, as produced by a [`CommentSource`](crate::CommentSource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Raw comment text.
    pub text: String,
    /// 0-based position in the source's fetch order.
    pub position: usize,
    /// Author display name, when the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Like count, when the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

impl Comment {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
            author: None,
            likes: None,
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn likes(mut self, likes: u64) -> Self {
        self.likes = Some(likes);
        self
    }
}
