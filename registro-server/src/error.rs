use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registro_core::validate::UploadError;
use serde_json::json;

use crate::store::{ConstraintViolation, InsertError};

/// An error from the API. Everything a handler can fail with collapses into
/// one of these at the boundary; nothing propagates unhandled.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// One of nombre, dni, or foto was empty or absent.
    MissingFields,

    /// The trimmed DNI was not exactly eight characters.
    DniLength,

    /// The photo failed the upload gate (content type or size).
    Upload(UploadError),

    /// The DNI is already registered. Mapped to 400 rather than 409, the
    /// same as every other form error.
    DuplicateDni,

    /// Storage reported the DNI too long for its column. The length check
    /// should have caught this first.
    DniTooLong,

    /// Something the caller can't fix. Logged in full where it arose; the
    /// diagnostic detail is still exposed since this is an internal tool.
    Internal(String),
}

impl Error {
    /// Machine-stable code for clients to match on.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::DniLength => "invalid_id_length",
            Self::Upload(UploadError::UnsupportedMediaType) => "unsupported_media_type",
            Self::Upload(UploadError::PayloadTooLarge) => "payload_too_large",
            Self::DuplicateDni => "duplicate_id",
            Self::DniTooLong => "id_too_long",
            Self::Internal(_) => "internal",
        }
    }

    /// Human-readable message, in the language of the form.
    fn message(&self) -> String {
        match self {
            Self::MissingFields => "Nombre, DNI y foto son requeridos".to_string(),
            Self::DniLength => "El DNI debe tener exactamente 8 caracteres".to_string(),
            Self::Upload(err) => err.to_string(),
            Self::DuplicateDni => "El DNI ya está registrado".to_string(),
            Self::DniTooLong => "El DNI es demasiado largo (máximo 8 caracteres)".to_string(),
            Self::Internal(_) => "Error al crear usuario".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": self.code(),
                    "message": self.message(),
                    "details": details,
                }),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.code(),
                    "message": self.message(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UploadError> for Error {
    fn from(err: UploadError) -> Self {
        Self::Upload(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(?err, "sqlx error");
        Self::Internal(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for Error {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        tracing::error!(?err, "multipart error");
        Self::Internal(err.to_string())
    }
}

impl From<InsertError> for Error {
    fn from(err: InsertError) -> Self {
        match err {
            InsertError::Constraint(ConstraintViolation::Uniqueness) => Self::DuplicateDni,
            InsertError::Constraint(ConstraintViolation::Length) => Self::DniTooLong,
            InsertError::Other(err) => err.into(),
        }
    }
}
