//! Client-side error taxonomy

use reqwest::StatusCode;
use thiserror::Error;

use crate::interfaces::http::common::ApiResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("session storage error: {0}")]
    Session(#[from] std::io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Build an error from a failed response. The envelope `code` decides
    /// when present; otherwise the status does.
    pub fn from_response(status: StatusCode, envelope: Option<ApiResponse>) -> Self {
        let (code, message) = match envelope {
            Some(body) => (body.code, body.error),
            None => (
                String::new(),
                status.canonical_reason().unwrap_or("request failed").to_string(),
            ),
        };

        match code.as_str() {
            "validation_error" => return Self::Validation(message),
            "authentication_error" => return Self::Authentication(message),
            "authorization_error" => return Self::Authorization(message),
            "not_found" => return Self::NotFound(message),
            "conflict" => return Self::Conflict(message),
            "invalid_state" => return Self::InvalidState(message),
            _ => {}
        }

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(message),
            StatusCode::UNAUTHORIZED => Self::Authentication(message),
            StatusCode::FORBIDDEN => Self::Authorization(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}
