//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{LoginRequest, RegisterRequest, UserDto};
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Invalid input", body = ApiResponse),
        (status = 409, description = "Email already exists", body = ApiResponse),
        (status = 422, description = "Field validation failed", body = ApiResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let user = state.auth.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserDto),
        (status = 401, description = "Invalid credentials", body = ApiResponse),
        (status = 422, description = "Field validation failed", body = ApiResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(UserDto::from(&user)))
}
