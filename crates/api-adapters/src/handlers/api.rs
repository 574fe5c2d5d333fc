//! JSON endpoints under `/api/v1`.

use axum::{extract::State, http::StatusCode, Json};
use domains::DomainError;
use serde::{Deserialize, Deserializer};
use services::{CommentDraft, Registration};

use crate::envelope::{MessageEnvelope, TokenEnvelope};
use crate::error::ApiError;
use crate::extract::{AuthenticatedUser, Payload, PublishSubmission};
use crate::state::AppState;

type Created = (StatusCode, Json<MessageEnvelope>);

fn created(message: &str) -> Created {
    (
        StatusCode::CREATED,
        Json(MessageEnvelope::new(StatusCode::CREATED.as_u16(), message)),
    )
}

/// Accepts an id sent either as a JSON number or as a string (form posts).
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<IdRepr>::deserialize(deserializer)? {
        Some(IdRepr::Number(id)) => Some(id),
        Some(IdRepr::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    email: Option<String>,
    password: Option<String>,
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload<LoginPayload>,
) -> Result<Json<TokenEnvelope>, ApiError> {
    let user = state
        .accounts
        .authenticate(body.email.as_deref(), body.password.as_deref())
        .await
        .map_err(|err| ApiError::internal("Error del servidor", err))?
        .ok_or(ApiError::LoginRejected)?;

    let token = state
        .accounts
        .issue_token(&user)
        .map_err(|err| ApiError::internal("No se pudo emitir un token", err))?;

    Ok(Json(TokenEnvelope {
        code: StatusCode::OK.as_u16(),
        token,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    nombre: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// POST /api/v1/registro
pub async fn register(
    State(state): State<AppState>,
    Payload(body): Payload<RegisterPayload>,
) -> Result<Created, ApiError> {
    let registration = Registration {
        name: body.nombre,
        email: body.email,
        password: body.password,
    };

    match state.accounts.register(registration).await {
        Ok(_) => Ok(created("Registro con éxito.")),
        Err(DomainError::Validation(_)) => Err(ApiError::MissingFields),
        Err(err) => Err(ApiError::internal("Error del servidor", err)),
    }
}

/// POST /api/v1/publicar
///
/// Token first, then the upload; the staged image is resolved by the service.
pub async fn publish(
    State(state): State<AppState>,
    AuthenticatedUser(author): AuthenticatedUser,
    PublishSubmission { draft, image }: PublishSubmission,
) -> Result<Created, ApiError> {
    match state.posts.publish(&author, draft, image).await {
        Ok(_) => Ok(created("Publicación realizada con éxito.")),
        Err(DomainError::Validation(_)) => Err(ApiError::MissingFields),
        Err(err) => Err(ApiError::internal("Error con la base de datos.", err)),
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    comentario: Option<String>,
    #[serde(rename = "idPublicacion", default, deserialize_with = "lenient_id")]
    id_publicacion: Option<i64>,
}

/// POST /api/v1/comentarios
pub async fn comment(
    State(state): State<AppState>,
    AuthenticatedUser(author): AuthenticatedUser,
    Payload(body): Payload<CommentPayload>,
) -> Result<Created, ApiError> {
    let draft = CommentDraft {
        text: body.comentario,
        post_id: body.id_publicacion,
    };

    state
        .comments
        .add_comment(&author, draft)
        .await
        .map_err(|err| ApiError::internal("no se pudo crear el comentario.", err))?;

    Ok(created("Comentario realizado con éxito."))
}
