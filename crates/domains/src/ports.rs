//! # Ports
//!
//! Every adapter crate implements one or more of these traits; the services
//! crate only ever sees `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Category, CommentId, CommentThread, Identity, NewComment, NewPost, NewUser, PostId,
    PostListing, Upload, User, UserId,
};

/// Read and write access to accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// At most one user owns a given email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<UserId>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<PostListing>>;
    async fn list_by_category(&self, category_name: &str) -> Result<Vec<PostListing>>;
    /// Fails with `NotFound` for an unknown id.
    async fn find_by_id(&self, id: PostId) -> Result<PostListing>;
    async fn insert(&self, post: NewPost) -> Result<PostId>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments (oldest first) and their count, read in one snapshot.
    async fn comments_with_count(&self, post_id: PostId) -> Result<CommentThread>;
    async fn insert(&self, comment: NewComment) -> Result<CommentId>;
}

/// Pluggable credential storage strategy.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    /// Returns false for a mismatch and for an unparseable hash alike.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Signs and verifies the bearer token carried by authenticated requests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, identity: &Identity) -> Result<String>;
    /// Fails with `Unauthorized` for a bad signature or an expired token.
    fn verify(&self, token: &str) -> Result<Identity>;
}

/// Storage for uploaded post images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persists the upload and returns the generated filename.
    /// Fails with `Validation` if the bytes are not a supported image.
    async fn save(&self, upload: Upload) -> Result<String>;
    async fn delete(&self, filename: &str) -> Result<()>;
    /// Public URL the file is served under.
    fn public_url(&self, filename: &str) -> String;
}
