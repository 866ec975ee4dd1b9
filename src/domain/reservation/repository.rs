//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationFilter, ReservationStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Store a new reservation with its initial status
    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Reservations matching every set field of `filter`, ordered by
    /// date, time, then id.
    async fn list(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>>;

    /// Set the status to `next` only if it is still `expected`.
    ///
    /// Returns `None` when the row is missing or its status has changed,
    /// so concurrent transitions on one id have exactly one winner.
    async fn update_status(
        &self,
        id: i32,
        expected: ReservationStatus,
        next: ReservationStatus,
    ) -> DomainResult<Option<Reservation>>;
}
