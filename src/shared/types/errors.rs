use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    InvalidState(String),

    #[error(transparent)]
    Internal(#[from] InfraError),
}

impl DomainError {
    pub fn reservation_not_found(id: i32) -> Self {
        DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(#[from] bcrypt::BcryptError),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Internal(InfraError::Database(e))
    }
}
