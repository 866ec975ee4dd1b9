//! Customer reservation module: create, list own, cancel

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
