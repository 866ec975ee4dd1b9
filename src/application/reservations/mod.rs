//! Reservation use-cases and the lifecycle orchestration around them.

pub mod service;

pub use service::{ReservationDraft, ReservationService, ReservationWithOwner};
