//! # Domain Models
//!
//! These structs represent the core entities of Gaceta.
//! Identifiers are the store's integer row ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type PostId = i64;
pub type CategoryId = i64;
pub type CommentId = i64;

/// A registered account. `password_hash` is a PHC string and never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The user data embedded in a signed token and attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
}

/// Insert payload for a user; the password has already been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A named grouping of posts. Seeded outside the HTTP write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub category_id: CategoryId,
    pub author_id: UserId,
    /// Filename of the image inside the upload directory.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// A post joined with the display names of its author and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListing {
    pub post: Post,
    pub author_name: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category_id: CategoryId,
    pub author_id: UserId,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentListing {
    pub comment: Comment,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
    pub author_id: UserId,
    pub post_id: PostId,
}

/// The comments on a post together with their count, read in a single snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentThread {
    pub comments: Vec<CommentListing>,
    pub count: i64,
}

/// Raw file handed over by the upload extractor.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: bytes::Bytes,
    pub content_type: Option<mime::Mime>,
    pub original_name: Option<String>,
}
