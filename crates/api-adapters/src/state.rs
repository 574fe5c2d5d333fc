use std::sync::Arc;

use services::{AccountService, CommentService, PostService};

/// Ceiling applied to the image attached to a new post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimit {
    pub megabytes: u64,
}

impl UploadLimit {
    pub fn bytes(self) -> usize {
        usize::try_from(self.megabytes.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

/// State shared across every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub upload_limit: UploadLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_limits_saturate_instead_of_overflowing() {
        assert_eq!(UploadLimit { megabytes: 2 }.bytes(), 2 * 1024 * 1024);
        assert_eq!(UploadLimit { megabytes: u64::MAX }.bytes(), usize::MAX);
    }
}
