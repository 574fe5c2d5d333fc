//! # Views
//!
//! Askama templates for every HTML route, plus the display models they render.
//! Dates are already formatted as `YYYY-MM-DD` by the time they reach a template.

use askama::Template;
use domains::{Category, CommentListing, Identity, PostListing};
use services::display_date;

/// A post as shown on listings and on its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub author: String,
    pub category: String,
    pub fecha: String,
}

impl PostCard {
    pub fn new(listing: PostListing, image_url: String) -> Self {
        Self {
            id: listing.post.id,
            title: listing.post.title,
            content: listing.post.content,
            image_url,
            author: listing.author_name,
            category: listing.category_name,
            fecha: display_date(listing.post.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCard {
    pub author: String,
    pub text: String,
    pub fecha: String,
}

impl From<CommentListing> for CommentCard {
    fn from(listing: CommentListing) -> Self {
        Self {
            author: listing.author_name,
            text: listing.comment.text,
            fecha: display_date(listing.comment.created_at),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub posts: Vec<PostCard>,
    pub error: Option<String>,
}

/// Listing of one fixed category (`/farandula`, `/politica`).
#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryPage {
    pub heading: &'static str,
    pub posts: Vec<PostCard>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub heading: &'static str,
}

#[derive(Template)]
#[template(path = "registro.html")]
pub struct RegisterPage {
    pub heading: &'static str,
}

#[derive(Template)]
#[template(path = "publicar.html")]
pub struct PublishPage {
    pub user: Option<Identity>,
    pub categories: Vec<Category>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "detalle_publicacion.html")]
pub struct PostDetailPage {
    pub post: Option<PostCard>,
    pub comments: Vec<CommentCard>,
    pub count: i64,
    pub error: Option<String>,
}

impl PostDetailPage {
    pub fn failed(error: &str) -> Self {
        Self {
            post: None,
            comments: Vec::new(),
            count: 0,
            error: Some(error.to_string()),
        }
    }
}
