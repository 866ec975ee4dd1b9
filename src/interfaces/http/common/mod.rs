//! Shared HTTP plumbing: error envelope, domain error mapping, extractors

pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Error envelope returned by every failing endpoint:
/// `{"success": false, "data": null, "error": "...", "code": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    /// Always `null` for errors
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    /// Human readable description
    pub error: String,
    /// Stable machine readable error code
    pub code: String,
}

impl ApiResponse {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: message.into(),
            code: code.to_string(),
        }
    }
}

/// Handler error: a domain error rendered as status + envelope.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DomainError::Authorization(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) | DomainError::InvalidState(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match &self.0 {
            DomainError::Validation(_) => "validation_error",
            DomainError::Authentication(_) => "authentication_error",
            DomainError::Authorization(_) => "authorization_error",
            DomainError::NotFound { .. } => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::InvalidState(_) => "invalid_state",
            DomainError::Internal(_) => "internal_error",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self.0 {
            DomainError::Internal(e) => {
                error!(error = %e, "Internal error while handling request");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ApiResponse::error(self.code(), message);
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Parse a positive numeric id taken from the URL path.
pub fn parse_id(raw: &str) -> ApiResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation(format!("invalid id '{}'", raw))),
    }
}
