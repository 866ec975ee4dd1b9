//! Reservation domain entity and its lifecycle state machine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Reservation status
///
/// `Pending` is initial, `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Created by the owner, awaiting an administrator
    Pending,
    /// Confirmed by an administrator
    Confirmed,
    /// Cancelled by the owner or an administrator
    Cancelled,
}

/// Events that move a reservation between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationEvent {
    Confirm,
    Cancel,
}

impl ReservationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        }
    }
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [Self::Pending, Self::Confirmed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::Cancelled
    }

    /// The status reached by applying `event`, or `InvalidState` if the
    /// transition is not allowed from this status.
    pub fn transition(self, event: ReservationEvent) -> DomainResult<Self> {
        match (self, event) {
            (Self::Pending, ReservationEvent::Confirm) => Ok(Self::Confirmed),
            (Self::Pending | Self::Confirmed, ReservationEvent::Cancel) => Ok(Self::Cancelled),
            (from, event) => Err(DomainError::InvalidState(format!(
                "cannot {} a {} reservation",
                event.as_str(),
                from.as_str()
            ))),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!("invalid status '{}'", other))),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Table booking owned by one user
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    /// Owning user, never changes
    pub user_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Party size, at least 1
    pub people: i32,
    pub comment: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// Validated input for a reservation that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub people: i32,
    pub comment: Option<String>,
}

impl NewReservation {
    pub fn new(
        user_id: i32,
        date: NaiveDate,
        time: NaiveTime,
        people: i32,
        comment: Option<String>,
    ) -> DomainResult<Self> {
        if people < 1 {
            return Err(DomainError::Validation(
                "people must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            user_id,
            date,
            time,
            people,
            comment,
        })
    }

    /// Every new reservation starts out pending.
    pub fn initial_status(&self) -> ReservationStatus {
        ReservationStatus::Pending
    }
}

/// Criteria for listing reservations. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationFilter {
    pub user_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    pub fn matches(&self, r: &Reservation) -> bool {
        self.user_id.map_or(true, |id| r.user_id == id)
            && self.date.map_or(true, |d| r.date == d)
            && self.status.map_or(true, |s| r.status == s)
    }
}

// ── Tests ──────────────────────────────────────────────────────
