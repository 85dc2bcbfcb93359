use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Translation service is not available")]
    TranslatorUnavailable,

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Could not understand audio")]
    AudioNotUnderstood,

    #[error("Speech recognition service error: {0}")]
    RecognitionFailed(String),

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Endpoint not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Internal(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::AudioNotUnderstood => StatusCode::BAD_REQUEST,
            AppError::TranslatorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::TranslationFailed(_)
            | AppError::SynthesisFailed(_)
            | AppError::RecognitionFailed(_)
            | AppError::Internal(_)
            | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::TranslatorUnavailable => "TRANSLATOR_UNAVAILABLE",
            AppError::TranslationFailed(_) => "TRANSLATION_ERROR",
            AppError::SynthesisFailed(_) => "TTS_ERROR",
            AppError::AudioNotUnderstood => "AUDIO_NOT_UNDERSTOOD",
            AppError::RecognitionFailed(_) => "STT_ERROR",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::NotFound => "NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::IoError(_) => "IO_ERROR",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match &self {
            AppError::Internal(detail) => {
                tracing::error!("Request failed: {} - {}", self.code(), detail)
            }
            _ if status.is_server_error() => {
                tracing::error!("Request failed: {} - {}", self.code(), message)
            }
            _ => tracing::warn!("Request rejected: {} - {}", self.code(), message),
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AudioNotUnderstood.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::TranslatorUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::RecognitionFailed("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_upstream_message_is_embedded() {
        let err = AppError::TranslationFailed("connection reset".into());
        assert_eq!(err.to_string(), "Translation failed: connection reset");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AppError::Internal("stack overflow in handler".into());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
