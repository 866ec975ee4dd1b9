use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `DomainError::Conflict` if the email is taken.
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Load every user whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>>;
}
