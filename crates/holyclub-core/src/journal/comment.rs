//! Threaded comments.

use serde::{Deserialize, Serialize};

use super::user::Author;
use super::{CommentId, EntryId};
use crate::error::{Error, InvalidInputError};

/// A comment on an entry, with its replies.
///
/// Threads are two levels deep: replies hang off top-level comments only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created_at: String,
    pub user: Author,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Comment {
    /// Number of comments in this thread, including this one.
    pub fn thread_len(&self) -> usize {
        1 + self.comments.iter().map(Comment::thread_len).sum::<usize>()
    }
}

/// A new comment or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    content: String,
    pober_id: EntryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment_id: Option<CommentId>,
}

impl CommentDraft {
    /// A top-level comment on `entry`.
    pub fn new(entry: EntryId, content: impl Into<String>) -> Result<Self, Error> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(InvalidInputError::Blank { field: "comment" }.into());
        }
        Ok(Self {
            content,
            pober_id: entry,
            comment_id: None,
        })
    }

    /// Make this a reply to the top-level comment `parent`.
    pub fn reply_to(mut self, parent: CommentId) -> Self {
        self.comment_id = Some(parent);
        self
    }

    pub fn entry(&self) -> EntryId {
        self.pober_id
    }

    pub fn parent(&self) -> Option<CommentId> {
        self.comment_id
    }
}
