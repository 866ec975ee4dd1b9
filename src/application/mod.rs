//! Application layer: use-case services over the domain repositories.

pub mod identity;
pub mod reservations;

pub use identity::{AuthService, NewUser, SeedUser};
pub use reservations::{ReservationDraft, ReservationService, ReservationWithOwner};
