//! Identity middleware for Axum
//!
//! Every protected route carries the caller's user id in `X-User-ID`.
//! The middleware resolves it to a stored user and puts a [`CurrentUser`]
//! into the request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::{DomainError, Principal, User};
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::router::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, available to handlers via `Extension<CurrentUser>`.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    pub principal: Principal,
}

fn user_id_from_headers(headers: &HeaderMap) -> Result<i32, DomainError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| DomainError::Authentication("missing X-User-ID header".into()))?;
    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| DomainError::Authentication("invalid X-User-ID header".into()))
}

pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = match user_id_from_headers(request.headers()) {
        Ok(id) => id,
        Err(e) => return ApiError::from(e).into_response(),
    };

    match state.auth.authenticate(user_id).await {
        Ok((user, principal)) => {
            debug!(user_id, role = principal.role.as_str(), "Request authenticated");
            request
                .extensions_mut()
                .insert(CurrentUser { user, principal });
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(v) = value {
            h.insert(USER_ID_HEADER, HeaderValue::from_str(v).unwrap());
        }
        h
    }

    #[test]
    fn reads_numeric_user_id() {
        assert_eq!(user_id_from_headers(&headers(Some("12"))).unwrap(), 12);
        assert_eq!(user_id_from_headers(&headers(Some(" 7 "))).unwrap(), 7);
    }

    #[test]
    fn missing_or_malformed_header_is_authentication_error() {
        for h in [headers(None), headers(Some("abc")), headers(Some("0")), headers(Some("-4"))] {
            assert!(matches!(
                user_id_from_headers(&h),
                Err(DomainError::Authentication(_))
            ));
        }
    }
}
