//! # services
//!
//! Use cases behind the Gaceta routes. Everything here talks to the outside
//! world through the `domains` port traits.

pub mod accounts;
pub mod comments;
pub mod posts;
pub mod uploads;

pub use accounts::{AccountService, Registration};
pub use comments::{CommentDraft, CommentService};
pub use posts::{PostDraft, PostService};
pub use uploads::StagedUpload;

use chrono::{DateTime, Utc};

/// Date format shown on every view.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn display_date(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_DATE_FORMAT).to_string()
}

/// A form field counts as missing when absent or blank.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
