//! Reservation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{ReservationDraft, ReservationWithOwner};
use crate::domain::{Reservation, ReservationStatus};
use crate::interfaces::http::common::{ApiError, ApiResult};
use crate::shared::validations::{parse_date, DATE_FORMAT, TIME_FORMAT};

/// Request to book a table
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Calendar date, `YYYY-MM-DD`
    #[schema(example = "2025-12-25")]
    pub date: String,
    /// Time of day, `HH:MM`
    #[schema(example = "20:00")]
    pub time: String,
    /// Party size, at least 1
    pub people: i32,
    #[validate(length(max = 1000, message = "comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

impl From<CreateReservationRequest> for ReservationDraft {
    fn from(r: CreateReservationRequest) -> Self {
        ReservationDraft {
            date: r.date,
            time: r.time,
            people: r.people,
            comment: r.comment,
        }
    }
}

/// Reservation details in API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub user_id: i32,
    #[schema(example = "2025-12-25")]
    pub date: String,
    #[schema(example = "20:00")]
    pub time: String,
    pub people: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// `pending`, `confirmed` or `cancelled`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date.format(DATE_FORMAT).to_string(),
            time: r.time.format(TIME_FORMAT).to_string(),
            people: r.people,
            comment: r.comment,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Owner fields embedded in administrator listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationOwnerDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Reservation with its owner, as seen by administrators
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminReservationDto {
    #[serde(flatten)]
    pub reservation: ReservationDto,
    pub user: Option<ReservationOwnerDto>,
}

impl From<ReservationWithOwner> for AdminReservationDto {
    fn from(r: ReservationWithOwner) -> Self {
        Self {
            user: r.owner.map(|u| ReservationOwnerDto {
                id: u.id,
                name: u.name,
                email: u.email,
            }),
            reservation: r.reservation.into(),
        }
    }
}

/// `?status=` filter for the customer's own list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnReservationsQuery {
    /// `pending`, `confirmed` or `cancelled`
    pub status: Option<String>,
}

/// `?date=&status=` filters for the administrator list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminReservationsQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `pending`, `confirmed` or `cancelled`
    pub status: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Empty query values count as absent.
pub fn parse_status_filter(value: &Option<String>) -> ApiResult<Option<ReservationStatus>> {
    present(value)
        .map(|s| s.parse::<ReservationStatus>().map_err(ApiError::from))
        .transpose()
}

pub fn parse_date_filter(value: &Option<String>) -> ApiResult<Option<chrono::NaiveDate>> {
    present(value)
        .map(|d| parse_date(d).map_err(ApiError::from))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn reservation() -> Reservation {
        Reservation {
            id: 5,
            user_id: 2,
            date: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            people: 2,
            comment: None,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn dto_uses_wire_formats() {
        let json = serde_json::to_value(ReservationDto::from(reservation())).unwrap();
        assert_eq!(json["date"], "2025-12-25");
        assert_eq!(json["time"], "20:00");
        assert_eq!(json["status"], "pending");
        assert!(json.get("comment").is_none());
    }

    #[test]
    fn empty_filters_are_absent() {
        assert_eq!(parse_status_filter(&Some("".into())).unwrap(), None);
        assert_eq!(parse_status_filter(&None).unwrap(), None);
        assert_eq!(
            parse_status_filter(&Some("confirmed".into())).unwrap(),
            Some(ReservationStatus::Confirmed)
        );
        assert!(parse_status_filter(&Some("done".into())).is_err());
        assert!(parse_date_filter(&Some("12/25/2025".into())).is_err());
    }
}
