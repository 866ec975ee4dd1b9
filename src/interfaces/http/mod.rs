//! HTTP REST API interfaces
//!
//! - `common`: error envelope, `ApiError`, `ValidatedJson`
//! - `middleware`: `X-User-ID` identity middleware
//! - `modules`: DTOs and handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
