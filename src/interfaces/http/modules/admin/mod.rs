//! Administrator reservation module: list all, confirm, cancel

pub mod handlers;

pub use handlers::*;
