//! HTTP surface of the site: askama views, JSON envelopes and, behind the
//! `web-axum` feature, the axum router with its extractors and handlers.

pub mod envelope;
pub mod views;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use router::router;
#[cfg(feature = "web-axum")]
pub use state::{AppState, UploadLimit};
