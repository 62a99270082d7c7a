use crate::db::StoreError;
use crate::models::envelope::ErrorEnvelope;
use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Missing required field: {0}")]
    ValidationFailed(&'static str),

    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Store task did not complete: {0}")]
    Blocking(#[from] BlockingError),

    #[error("Forms service error: {0}")]
    FormsService(String),
}

impl ApiError {
    fn category(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::UnsupportedMediaType(_) => "Unsupported media type",
            ApiError::MalformedBody(_) => "Malformed body",
            ApiError::PayloadTooLarge(_) => "Payload too large",
            ApiError::ValidationFailed(_) => "Validation failed",
            ApiError::NotConfigured(_) => "Not configured",
            ApiError::Store(StoreError::Unavailable(_)) => "Store unavailable",
            ApiError::Store(StoreError::WriteFailed(_)) => "Failed to save review",
            ApiError::Store(StoreError::ReadFailed(_)) => "Failed to fetch reviews",
            ApiError::Blocking(_) => "Store unavailable",
            ApiError::FormsService(_) => "Forms service error",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::ValidationFailed(field) => {
                format!("Please fill in the \"{field}\" field")
            }
            ApiError::MethodNotAllowed
            | ApiError::UnsupportedMediaType(_)
            | ApiError::MalformedBody(_)
            | ApiError::PayloadTooLarge(_) => "The request could not be processed".to_string(),
            _ => "Something went wrong on our side, please try again later".to_string(),
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.category().to_string(),
            details: self.to_string(),
            message: self.user_message(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::MalformedBody(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotConfigured(_) | ApiError::Store(_) | ApiError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::FormsService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_field() {
        let envelope = ApiError::ValidationFailed("movie-name").envelope();
        assert_eq!(envelope.error, "Validation failed");
        assert_eq!(envelope.details, "Missing required field: movie-name");
        assert!(envelope.message.contains("movie-name"));
    }

    #[test]
    fn client_and_server_faults_use_different_status_classes() {
        assert!(ApiError::ValidationFailed("name").status_code().is_client_error());
        assert!(ApiError::UnsupportedMediaType("text/plain".into())
            .status_code()
            .is_client_error());
        assert!(ApiError::NotConfigured("forms site id").status_code().is_server_error());
        assert!(ApiError::FormsService("timeout".into()).status_code().is_server_error());
    }

    #[test]
    fn oversized_body_is_a_client_error_with_envelope() {
        let err = ApiError::PayloadTooLarge(1024);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        let envelope = err.envelope();
        assert_eq!(envelope.error, "Payload too large");
        assert_eq!(envelope.details, "Request body exceeds 1024 bytes");
        assert_eq!(envelope.message, "The request could not be processed");
    }
}
