use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{api, views};
use crate::state::AppState;

/// Room left for the text fields and multipart framing around the image.
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Builds the full application: HTML views, `/api/v1` endpoints and static
/// files from `public_dir` mounted under `/public`.
///
/// Anything unmatched gets the "Ruta no existe" page, whether the path is
/// unknown, the method is wrong for a known path, or the static file is missing.
pub fn router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    let publish_limit = state.upload_limit.bytes().saturating_add(FORM_OVERHEAD);

    let api = Router::new()
        .route("/login", post(api::login))
        .route("/registro", post(api::register))
        .route(
            "/publicar",
            post(api::publish).layer(DefaultBodyLimit::max(publish_limit)),
        )
        .route("/comentarios", post(api::comment));

    Router::new()
        .route("/", get(views::home))
        .route("/login", get(views::login_form))
        .route("/registro", get(views::register_form))
        .route("/publicar", get(views::publish_form))
        .route("/farandula", get(views::farandula))
        .route("/politica", get(views::politica))
        .route("/publicacion/{id}", get(views::post_detail))
        .nest("/api/v1", api)
        .nest_service(
            "/public",
            ServeDir::new(public_dir.as_ref()).not_found_service(views::not_found.into_service()),
        )
        .method_not_allowed_fallback(views::not_found)
        .fallback(views::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
