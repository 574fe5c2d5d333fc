//! Comments on posts, always attributed to the token owner.

use std::sync::Arc;

use domains::{
    CommentId, CommentRepository, DomainError, Identity, NewComment, PostId, Result,
};
use tracing::info;

use crate::present;

/// Fields of the comment form, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub text: Option<String>,
    pub post_id: Option<PostId>,
}

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    /// Stores a comment owned by the authenticated `author`.
    pub async fn add_comment(&self, author: &Identity, draft: CommentDraft) -> Result<CommentId> {
        let (Some(text), Some(post_id)) = (present(draft.text), draft.post_id) else {
            return Err(DomainError::Validation(
                "comentario and idPublicacion are required".to_string(),
            ));
        };

        let id = self
            .comments
            .insert(NewComment {
                text,
                author_id: author.id,
                post_id,
            })
            .await?;

        info!(comment_id = id, post_id, author_id = author.id, "comment added");
        Ok(id)
    }
}
