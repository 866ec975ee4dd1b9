//! Reservation aggregate
//!
//! Contains the Reservation entity, its lifecycle state machine, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{
    NewReservation, Reservation, ReservationEvent, ReservationFilter, ReservationStatus,
};
pub use repository::ReservationRepository;
