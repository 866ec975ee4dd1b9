//! Client side of the reservation API: a persisted session and typed calls.

pub mod api;
pub mod error;
pub mod session;

pub use api::{ApiClient, ReservationInput};
pub use error::{ClientError, ClientResult};
pub use session::{default_session_path, Session};
