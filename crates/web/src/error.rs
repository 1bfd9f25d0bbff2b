use std::collections::BTreeMap;
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storage::error::StorageError;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    TooManyRequests,
}

/// Body shared by every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    /// Field name to violation message, present for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            errors: None,
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::TooManyRequests => write!(f, "Too many requests"),
        }
    }
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::Duplicate { .. }) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(e @ StorageError::NotFound { .. }) => {
                tracing::warn!("Resource not found: {}", e);
                ErrorResponse::new(status_code, e.to_string())
            }
            Self::Storage(e @ StorageError::Duplicate { .. }) => {
                tracing::warn!("Duplicate athlete attempt: {}", e);
                ErrorResponse::new(status_code, e.to_string())
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                ErrorResponse::new(status_code, "An internal error occurred")
            }
            Self::Validation(errors) => {
                let field_errors: BTreeMap<String, String> = errors
                    .field_errors()
                    .into_iter()
                    .filter_map(|(field, errors)| {
                        errors.first().map(|e| {
                            let message = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            (to_camel_case(&field), message)
                        })
                    })
                    .collect();

                tracing::warn!(
                    "Validation failed for request: {} field errors found",
                    field_errors.len()
                );
                tracing::debug!("Field validation errors: {:?}", field_errors);

                ErrorResponse {
                    errors: Some(field_errors),
                    ..ErrorResponse::new(status_code, "Validation failed")
                }
            }
            Self::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                ErrorResponse::new(status_code, msg.clone())
            }
            Self::TooManyRequests => ErrorResponse::new(status_code, "Too many requests"),
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

/// `birth_date` -> `birthDate`, matching the JSON field names
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
