//! API error taxonomy and its mapping onto HTTP responses.
//!
//! Every handler returns `Result<HttpResponse, ApiError>`; actix renders the
//! error through the `ResponseError` impl below. Validation problems carry
//! the offending field so clients can attach the message to the right input.
//! Storage failures surface as `503 Service Unavailable` without leaking SQL
//! detail; the detail goes to the log instead.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed submission; 400 with field-level detail.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Unknown resource. Deliberately also covers resources that exist but
    /// are not published/approved, so absence cannot be told apart.
    #[error("not found")]
    NotFound,

    /// Database trouble; per-request, never fatal to the process.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> ApiError {
        ApiError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation { field, message } => {
                HttpResponse::BadRequest().json(json!({ "error": message, "field": field }))
            }
            ApiError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
            ApiError::Storage(err) => {
                log::error!("storage error: {}", err);
                HttpResponse::ServiceUnavailable()
                    .json(json!({ "error": "storage temporarily unavailable" }))
            }
        }
    }
}
