//! Administrator HTTP handlers
//!
//! Every handler checks `Action::Administer` first, so a customer gets 403
//! here even for operations they could perform on the customer routes.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::domain::Action;
use crate::interfaces::http::common::{parse_id, ApiResponse, ApiResult};
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::modules::reservations::{
    parse_date_filter, parse_status_filter, AdminReservationDto, AdminReservationsQuery,
    ReservationDto,
};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/admin/reservations",
    tag = "Administration",
    security(("user_id" = [])),
    params(AdminReservationsQuery),
    responses(
        (status = 200, description = "Matching reservations with their owners", body = Vec<AdminReservationDto>),
        (status = 400, description = "Malformed date or unknown status", body = ApiResponse),
        (status = 403, description = "Administrator role required", body = ApiResponse)
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<AdminReservationsQuery>,
) -> ApiResult<Json<Vec<AdminReservationDto>>> {
    current.principal.authorize(Action::Administer)?;
    let date = parse_date_filter(&query.date)?;
    let status = parse_status_filter(&query.status)?;
    let list = state
        .reservations
        .list_all(&current.principal, date, status)
        .await?;
    Ok(Json(list.into_iter().map(AdminReservationDto::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/admin/reservations/{id}/confirm",
    tag = "Administration",
    security(("user_id" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation confirmed", body = ReservationDto),
        (status = 403, description = "Administrator role required", body = ApiResponse),
        (status = 404, description = "Reservation not found", body = ApiResponse),
        (status = 409, description = "Reservation is not pending", body = ApiResponse)
    )
)]
pub async fn confirm_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReservationDto>> {
    current.principal.authorize(Action::Administer)?;
    let id = parse_id(&id)?;
    let reservation = state.reservations.confirm(&current.principal, id).await?;
    Ok(Json(reservation.into()))
}

#[utoipa::path(
    patch,
    path = "/admin/reservations/{id}/cancel",
    operation_id = "admin_cancel_reservation",
    tag = "Administration",
    security(("user_id" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationDto),
        (status = 403, description = "Administrator role required", body = ApiResponse),
        (status = 404, description = "Reservation not found", body = ApiResponse),
        (status = 409, description = "Already cancelled", body = ApiResponse)
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReservationDto>> {
    current.principal.authorize(Action::Administer)?;
    let id = parse_id(&id)?;
    let reservation = state.reservations.cancel(&current.principal, id).await?;
    Ok(Json(reservation.into()))
}
