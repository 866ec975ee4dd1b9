//! Reservation service
//!
//! Applies the lifecycle state machine and the authorization rules, then
//! persists transitions with compare-and-set writes.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    Action, DomainError, DomainResult, NewReservation, Principal, RepositoryProvider,
    Reservation, ReservationEvent, ReservationFilter, ReservationStatus, User,
};
use crate::shared::validations::{normalize_comment, parse_date, parse_time};

/// Unparsed reservation input.
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub people: i32,
    pub comment: Option<String>,
}

/// A reservation together with the user who made it.
#[derive(Debug, Clone)]
pub struct ReservationWithOwner {
    pub reservation: Reservation,
    pub owner: Option<User>,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a pending reservation owned by `principal`.
    pub async fn create(
        &self,
        principal: &Principal,
        draft: ReservationDraft,
    ) -> DomainResult<Reservation> {
        principal.authorize(Action::Create)?;

        let date = parse_date(&draft.date)?;
        let time = parse_time(&draft.time)?;
        let new = NewReservation::new(
            principal.user_id,
            date,
            time,
            draft.people,
            normalize_comment(draft.comment),
        )?;

        let reservation = self.repos.reservations().create(new).await?;
        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            user_id = reservation.user_id,
            date = %reservation.date,
            people = reservation.people,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// The principal's own reservations, optionally narrowed to one status.
    pub async fn list_own(
        &self,
        principal: &Principal,
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<Reservation>> {
        principal.authorize(Action::ListOwn)?;
        self.repos
            .reservations()
            .list(ReservationFilter {
                user_id: Some(principal.user_id),
                date: None,
                status,
            })
            .await
    }

    /// Every reservation matching the optional filters, with owners attached.
    pub async fn list_all(
        &self,
        principal: &Principal,
        date: Option<chrono::NaiveDate>,
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<ReservationWithOwner>> {
        principal.authorize(Action::ListAll)?;

        let reservations = self
            .repos
            .reservations()
            .list(ReservationFilter {
                user_id: None,
                date,
                status,
            })
            .await?;

        let mut ids: Vec<i32> = reservations.iter().map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let owners: HashMap<i32, User> = self
            .repos
            .users()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| ReservationWithOwner {
                owner: owners.get(&reservation.user_id).cloned(),
                reservation,
            })
            .collect())
    }

    /// Move a pending reservation to confirmed. Administrators only.
    pub async fn confirm(&self, principal: &Principal, id: i32) -> DomainResult<Reservation> {
        principal.authorize(Action::Confirm)?;
        let current = self.load(id).await?;
        self.apply(current, ReservationEvent::Confirm).await
    }

    /// Cancel a pending or confirmed reservation. Owner or administrator.
    pub async fn cancel(&self, principal: &Principal, id: i32) -> DomainResult<Reservation> {
        let current = self.load(id).await?;
        principal.authorize(Action::Cancel(&current))?;
        self.apply(current, ReservationEvent::Cancel).await
    }

    async fn load(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))
    }

    /// Apply `event` starting from `current`. When another writer changed the
    /// status first, re-read and judge the event against the new status.
    /// Statuses only move forward, so this loops at most once per status.
    async fn apply(
        &self,
        mut current: Reservation,
        event: ReservationEvent,
    ) -> DomainResult<Reservation> {
        loop {
            let next = current.status.transition(event)?;
            if let Some(updated) = self
                .repos
                .reservations()
                .update_status(current.id, current.status, next)
                .await?
            {
                metrics::counter!("reservation_transitions_total", "to" => next.as_str())
                    .increment(1);
                info!(
                    reservation_id = updated.id,
                    from = %current.status,
                    to = %next,
                    "Reservation status changed"
                );
                return Ok(updated);
            }

            warn!(
                reservation_id = current.id,
                event = event.as_str(),
                "Reservation changed concurrently, re-reading"
            );
            current = self.load(current.id).await?;
            debug!(reservation_id = current.id, status = %current.status, "Re-read reservation");
        }
    }
}
