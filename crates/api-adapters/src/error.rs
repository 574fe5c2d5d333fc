//! # ApiError
//!
//! Every failure a JSON endpoint or an extractor can produce. Each variant
//! maps to a status code and a fixed public message; the underlying cause is
//! only ever logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domains::DomainError;
use thiserror::Error;
use tracing::{debug, error};

use crate::envelope::MessageEnvelope;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authorization token missing")]
    MissingToken,
    #[error("authorization token rejected: {0}")]
    InvalidToken(#[source] DomainError),
    #[error("credentials did not match")]
    LoginRejected,
    #[error("required fields missing")]
    MissingFields,
    #[error("no image attached")]
    MissingImage,
    #[error("attached file rejected: {0}")]
    InvalidUpload(#[source] DomainError),
    #[error("upload larger than {0} MB")]
    PayloadTooLarge(u64),
    #[error("request body rejected: {0}")]
    Body(String),
    #[error("{public}: {source}")]
    Internal {
        public: &'static str,
        source: DomainError,
    },
}

impl ApiError {
    pub fn internal(public: &'static str, source: DomainError) -> Self {
        Self::Internal { public, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken(_) | ApiError::LoginRejected => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::MissingFields
            | ApiError::MissingImage
            | ApiError::InvalidUpload(_)
            | ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            ApiError::MissingToken => "Debe iniciar sesión para continuar.".to_string(),
            ApiError::InvalidToken(_) => "Token inválido o expirado.".to_string(),
            ApiError::LoginRejected => "Pruebe intentando otra vez".to_string(),
            ApiError::MissingFields => {
                "no ha proporcionado todo el contenido requerido.".to_string()
            }
            ApiError::MissingImage => "Debe adjuntar una imagen.".to_string(),
            ApiError::InvalidUpload(_) => "El archivo adjunto no es una imagen válida.".to_string(),
            ApiError::PayloadTooLarge(limit_mb) => {
                format!("Usted ha superado el límite permitido ({limit_mb})")
            }
            ApiError::Body(_) => "Solicitud inválida.".to_string(),
            ApiError::Internal { public, .. } => (*public).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            debug!(error = %self, %status, "Replying with error");
        }

        let envelope = MessageEnvelope::new(status.as_u16(), self.public_message());
        (status, Json(envelope)).into_response()
    }
}
