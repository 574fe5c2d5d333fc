//! HTML routes. A failed lookup never escapes as an error status: the view is
//! rendered with an inline message instead.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use domains::{DomainError, PostListing};
use tracing::error;

use crate::extract::AuthenticatedUser;
use crate::state::AppState;
use crate::views::{
    CategoryPage, CommentCard, HomePage, LoginPage, PostCard, PostDetailPage, PublishPage,
    RegisterPage,
};

const FARANDULA: &str = "Farandula";
const POLITICA: &str = "Politica";

fn render<T: Template>(page: &T) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error al generar la vista").into_response()
        }
    }
}

fn cards(state: &AppState, listings: Vec<PostListing>) -> Vec<PostCard> {
    listings
        .into_iter()
        .map(|listing| {
            let image_url = state.posts.image_url(&listing.post.image);
            PostCard::new(listing, image_url)
        })
        .collect()
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Response {
    let page = match state.posts.list_posts().await {
        Ok(listings) => HomePage {
            posts: cards(&state, listings),
            error: None,
        },
        Err(err) => {
            error!(error = %err, "could not load posts");
            HomePage {
                posts: Vec::new(),
                error: Some("No se pudieron cargar las publicaciones".to_string()),
            }
        }
    };
    render(&page)
}

/// GET /login
pub async fn login_form() -> Response {
    render(&LoginPage { heading: "Ingresar" })
}

/// GET /registro
pub async fn register_form() -> Response {
    render(&RegisterPage { heading: "Registro" })
}

/// GET /publicar
pub async fn publish_form(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Response {
    let page = match state.posts.categories().await {
        Ok(categories) => PublishPage {
            user: Some(user),
            categories,
            error: None,
        },
        Err(err) => {
            error!(error = %err, "could not load categories");
            PublishPage {
                user: None,
                categories: Vec::new(),
                error: Some(
                    "Se ha generado un error que no permite cargar los datos de la vista."
                        .to_string(),
                ),
            }
        }
    };
    render(&page)
}

async fn category_listing(state: &AppState, category: &'static str) -> Response {
    let page = match state.posts.posts_in_category(category).await {
        Ok(listings) => CategoryPage {
            heading: category,
            posts: cards(state, listings),
            error: None,
        },
        Err(err) => {
            error!(error = %err, category, "could not load category");
            CategoryPage {
                heading: category,
                posts: Vec::new(),
                error: Some("No se pudieron cargar las categorias".to_string()),
            }
        }
    };
    render(&page)
}

/// GET /farandula
pub async fn farandula(State(state): State<AppState>) -> Response {
    category_listing(&state, FARANDULA).await
}

/// GET /politica
pub async fn politica(State(state): State<AppState>) -> Response {
    category_listing(&state, POLITICA).await
}

/// GET /publicacion/{id}
pub async fn post_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    const POST_MISSING: &str = "No se pudo encontrar la publicación";

    let Ok(id) = id.parse::<i64>() else {
        return render(&PostDetailPage::failed(POST_MISSING));
    };

    let thread = match state.posts.comment_thread(id).await {
        Ok(thread) => thread,
        Err(err) => {
            error!(error = %err, post_id = id, "could not load comments");
            return render(&PostDetailPage::failed("Error al cargar los comentarios"));
        }
    };

    let page = match state.posts.find_post(id).await {
        Ok(listing) => {
            let image_url = state.posts.image_url(&listing.post.image);
            PostDetailPage {
                post: Some(PostCard::new(listing, image_url)),
                comments: thread.comments.into_iter().map(CommentCard::from).collect(),
                count: thread.count,
                error: None,
            }
        }
        Err(DomainError::NotFound(..)) => PostDetailPage::failed(POST_MISSING),
        Err(err) => {
            error!(error = %err, post_id = id, "could not load post");
            PostDetailPage::failed(POST_MISSING)
        }
    };
    render(&page)
}

/// Catch-all for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html("<p>Ruta no existe <a href='/'>Volver</a></p>"),
    )
}
