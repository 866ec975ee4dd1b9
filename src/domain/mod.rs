//! Domain layer
//!
//! Aggregates (user, reservation), their repository interfaces, and the
//! principal/role model used for authorization.

pub mod principal;
pub mod repositories;
pub mod reservation;
pub mod user;

pub use principal::{Action, Principal, Role};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    NewReservation, Reservation, ReservationEvent, ReservationFilter, ReservationRepository,
    ReservationStatus,
};
pub use user::{CreateUserDto, User, UserRepository};

pub use crate::shared::errors::DomainError;
