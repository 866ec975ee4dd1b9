//! Identity module: registration, login and request authentication
//!
//! `AuthService` owns password hashing and the email uniqueness rules.

pub mod service;

pub use service::{AuthService, NewUser, SeedUser};
