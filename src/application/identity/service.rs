//! Authentication service, application-layer orchestration
//!
//! HTTP handlers and the identity middleware are thin wrappers that
//! delegate here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Principal, RepositoryProvider, User,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password, DEFAULT_COST};
use crate::shared::errors::InfraError;
use crate::shared::validations::normalize_email;

/// Registration input as received from the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// An account created at startup if its email is not registered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new, non-administrator user.
    pub async fn register(&self, input: NewUser) -> DomainResult<User> {
        let name = input.name.trim().to_string();
        let email = normalize_email(&input.email);

        if name.is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        validate_email(&email)?;
        if input.password.is_empty() {
            return Err(DomainError::Validation("password is required".into()));
        }

        let user = self.insert(name, email, &input.password, false).await?;
        info!(user_id = user.id, email = %user.email, "New user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check email + password and return the matching user.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().find_by_email(&email).await? else {
            debug!(email = %email, "Login for unknown email");
            return Err(invalid_credentials());
        };

        let valid = verify_password(password, &user.password_hash).map_err(InfraError::from)?;
        if !valid {
            debug!(user_id = user.id, "Login with wrong password");
            return Err(invalid_credentials());
        }

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    /// Resolve the user named by a request's identity.
    pub async fn authenticate(&self, user_id: i32) -> DomainResult<(User, Principal)> {
        match self.repos.users().find_by_id(user_id).await? {
            Some(user) => {
                let principal = user.principal();
                Ok((user, principal))
            }
            None => Err(DomainError::Authentication("unknown user".into())),
        }
    }

    // ── Seeding ─────────────────────────────────────────────────

    /// Create each seed account whose email is not registered yet.
    /// Returns how many accounts were created.
    pub async fn seed_users(&self, seeds: &[SeedUser]) -> DomainResult<usize> {
        let mut created = 0;
        for seed in seeds {
            let email = normalize_email(&seed.email);
            if self.repos.users().find_by_email(&email).await?.is_some() {
                debug!(email = %email, "Seed user already present");
                continue;
            }
            let user = self
                .insert(seed.name.trim().to_string(), email, &seed.password, seed.is_admin)
                .await?;
            info!(user_id = user.id, email = %user.email, is_admin = user.is_admin, "Seed user created");
            created += 1;
        }
        Ok(created)
    }

    async fn insert(
        &self,
        name: String,
        email: String,
        password: &str,
        is_admin: bool,
    ) -> DomainResult<User> {
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }
        let password_hash = hash_password(password, self.bcrypt_cost).map_err(InfraError::from)?;
        self.repos
            .users()
            .create(CreateUserDto {
                name,
                email,
                password_hash,
                is_admin,
            })
            .await
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::Authentication("invalid credentials".into())
}

fn email_taken() -> DomainError {
    DomainError::Conflict("email already exists".into())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.is_empty() {
        return Err(DomainError::Validation("email is required".into()));
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed {
        return Err(DomainError::Validation(format!("invalid email '{}'", email)));
    }
    Ok(())
}
