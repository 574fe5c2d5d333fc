//! Reading and publishing posts.

use std::sync::Arc;

use domains::{
    Category, CategoryId, CategoryRepository, CommentRepository, CommentThread, DomainError,
    Identity, MediaStorage, NewPost, PostId, PostListing, PostRepository, Result, Upload,
};
use tracing::info;

use crate::present;
use crate::uploads::StagedUpload;

/// Fields of the publish form, as submitted. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl PostDraft {
    fn complete(self) -> Option<(String, String, CategoryId)> {
        Some((present(self.title)?, present(self.content)?, self.category_id?))
    }
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStorage>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            posts,
            categories,
            comments,
            media,
        }
    }

    pub async fn list_posts(&self) -> Result<Vec<PostListing>> {
        self.posts.list().await
    }

    pub async fn posts_in_category(&self, category_name: &str) -> Result<Vec<PostListing>> {
        self.posts.list_by_category(category_name).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    pub async fn find_post(&self, id: PostId) -> Result<PostListing> {
        self.posts.find_by_id(id).await
    }

    pub async fn comment_thread(&self, post_id: PostId) -> Result<CommentThread> {
        self.comments.comments_with_count(post_id).await
    }

    pub fn image_url(&self, filename: &str) -> String {
        self.media.public_url(filename)
    }

    /// Writes the image to storage ahead of the post insert.
    pub async fn stage_upload(&self, upload: Upload) -> Result<StagedUpload> {
        StagedUpload::stage(Arc::clone(&self.media), upload).await
    }

    /// Stores a post for `author` referencing the staged image.
    ///
    /// The image is removed again if a required field is missing or the
    /// insert fails, so no rejected publish leaves a file behind.
    pub async fn publish(
        &self,
        author: &Identity,
        draft: PostDraft,
        image: StagedUpload,
    ) -> Result<PostId> {
        let Some((title, content, category_id)) = draft.complete() else {
            image.discard().await;
            return Err(DomainError::Validation(
                "titulo, contenido and idCategoria are required".to_string(),
            ));
        };

        let new_post = NewPost {
            title,
            content,
            category_id,
            author_id: author.id,
            image: image.filename().to_string(),
        };

        match self.posts.insert(new_post).await {
            Ok(id) => {
                image.commit();
                info!(post_id = id, author_id = author.id, "post published");
                Ok(id)
            }
            Err(err) => {
                image.discard().await;
                Err(err)
            }
        }
    }
}
