//! # Vesuvio reservation service
//!
//! Table reservations for a single restaurant: customers register, log in
//! and manage their own reservations; administrators confirm and cancel
//! any reservation.
//!
//! ## Architecture
//!
//! - **domain**: users, reservations, the lifecycle state machine,
//!   roles and repository traits
//! - **application**: auth and reservation use cases
//! - **infrastructure**: SeaORM persistence, password hashing, in-memory
//!   repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **client**: session holder and typed API wrappers used by the CLI
//! - **server**: runtime lifecycle (startup, seeding, graceful shutdown)

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
