//! Reservation HTTP handlers for the signed-in customer

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::interfaces::http::common::{parse_id, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/reservations",
    tag = "Reservations",
    security(("user_id" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created as pending", body = ReservationDto),
        (status = 400, description = "Invalid date, time or party size", body = ApiResponse),
        (status = 401, description = "Missing or unknown X-User-ID", body = ApiResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationDto>)> {
    let reservation = state
        .reservations
        .create(&current.principal, request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(reservation.into())))
}

#[utoipa::path(
    get,
    path = "/my/reservations",
    tag = "Reservations",
    security(("user_id" = [])),
    params(OwnReservationsQuery),
    responses(
        (status = 200, description = "The caller's reservations", body = Vec<ReservationDto>),
        (status = 400, description = "Unknown status filter", body = ApiResponse),
        (status = 401, description = "Missing or unknown X-User-ID", body = ApiResponse)
    )
)]
pub async fn my_reservations(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<OwnReservationsQuery>,
) -> ApiResult<Json<Vec<ReservationDto>>> {
    let status = parse_status_filter(&query.status)?;
    let list = state.reservations.list_own(&current.principal, status).await?;
    Ok(Json(list.into_iter().map(ReservationDto::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/reservations/{id}/cancel",
    tag = "Reservations",
    security(("user_id" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationDto),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Reservation not found", body = ApiResponse),
        (status = 409, description = "Already cancelled", body = ApiResponse)
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReservationDto>> {
    let id = parse_id(&id)?;
    let reservation = state.reservations.cancel(&current.principal, id).await?;
    Ok(Json(reservation.into()))
}
