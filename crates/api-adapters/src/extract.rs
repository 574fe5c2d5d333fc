//! Request extractors: the authentication guard, the publish form with its
//! image, and a body parser accepting both JSON and urlencoded forms.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        FromRequest, FromRequestParts, Multipart, Query, Request,
    },
    http::{header, request::Parts, StatusCode},
    Form, Json,
};
use bytes::BytesMut;
use domains::{DomainError, Identity, Upload};
use serde::{de::DeserializeOwned, Deserialize};
use services::{PostDraft, StagedUpload};

use crate::error::ApiError;
use crate::state::{AppState, UploadLimit};

/// The user decoded from a valid token. Requests without one never reach the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Identity);

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Reads the token from `Authorization` (`Bearer <t>` or a bare `<t>`), falling
/// back to a `token` query parameter for plain browser navigation.
fn request_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.token)
            .filter(|token| !token.is_empty())
    })
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = request_token(parts).ok_or(ApiError::MissingToken)?;
        let identity = state
            .accounts
            .identify(&token)
            .map_err(ApiError::InvalidToken)?;
        Ok(Self(identity))
    }
}

/// Body of the JSON endpoints; `application/x-www-form-urlencoded` is accepted too.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::Body(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::Body(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// The multipart publish form. By the time a handler sees it the image is
/// already on disk, held as a `StagedUpload` the handler must resolve.
#[derive(Debug)]
pub struct PublishSubmission {
    pub draft: PostDraft,
    pub image: StagedUpload,
}

fn multipart_error(err: MultipartError, limit: UploadLimit) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(limit.megabytes)
    } else {
        ApiError::Body(err.body_text())
    }
}

/// Buffers the file field, aborting as soon as it exceeds the ceiling.
async fn read_image(mut field: Field<'_>, limit: UploadLimit) -> Result<Upload, ApiError> {
    let original_name = field.file_name().map(str::to_string);
    let content_type = field
        .content_type()
        .and_then(|value| value.parse::<mime::Mime>().ok());

    let mut data = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|err| multipart_error(err, limit))?
    {
        if data.len() + chunk.len() > limit.bytes() {
            return Err(ApiError::PayloadTooLarge(limit.megabytes));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(Upload {
        data: data.freeze(),
        content_type,
        original_name,
    })
}

impl FromRequest<AppState> for PublishSubmission {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let limit = state.upload_limit;
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Body(rejection.body_text()))?;

        let mut draft = PostDraft::default();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| multipart_error(err, limit))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "imagen" => image = Some(read_image(field, limit).await?),
                "titulo" | "contenido" | "idCategoria" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|err| multipart_error(err, limit))?;
                    match name.as_str() {
                        "titulo" => draft.title = Some(text),
                        "contenido" => draft.content = Some(text),
                        _ => draft.category_id = text.trim().parse().ok(),
                    }
                }
                _ => {}
            }
        }

        let upload = image
            .filter(|upload| !upload.data.is_empty())
            .ok_or(ApiError::MissingImage)?;

        let image = state.posts.stage_upload(upload).await.map_err(|err| match err {
            DomainError::Validation(_) => ApiError::InvalidUpload(err),
            other => ApiError::internal("no se pudo realizar la publicación", other),
        })?;

        Ok(Self { draft, image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts(request: HttpRequest<()>) -> Parts {
        request.into_parts().0
    }

    #[test]
    fn bearer_prefix_is_optional() {
        let bearer = parts(
            HttpRequest::get("/publicar")
                .header("Authorization", "Bearer abc")
                .body(())
                .unwrap(),
        );
        let bare = parts(
            HttpRequest::get("/publicar")
                .header("Authorization", "abc")
                .body(())
                .unwrap(),
        );

        assert_eq!(request_token(&bearer).as_deref(), Some("abc"));
        assert_eq!(request_token(&bare).as_deref(), Some("abc"));
    }

    #[test]
    fn query_token_is_a_fallback() {
        let query = parts(HttpRequest::get("/publicar?token=xyz").body(()).unwrap());
        let none = parts(HttpRequest::get("/publicar").body(()).unwrap());

        assert_eq!(request_token(&query).as_deref(), Some("xyz"));
        assert_eq!(request_token(&none), None);
    }
}
