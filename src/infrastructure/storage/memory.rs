//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation,
    ReservationFilter, ReservationRepository, ReservationStatus, User, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<i32, User>,
    // email -> id, doubles as the uniqueness index
    emails: DashMap<String, i32>,
    counter: AtomicI32,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let entry = match self.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict("email already exists".to_string()));
            }
            Entry::Vacant(v) => v,
        };

        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let user = User {
            id,
            name: dto.name,
            email: dto.email,
            password_hash: dto.password_hash,
            is_admin: dto.is_admin,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        entry.insert(id);
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| *e) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect();
        users.sort_by_key(|u| u.id);
        users.dedup_by_key(|u| u.id);
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: DashMap<i32, Reservation>,
    counter: AtomicI32,
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, r: NewReservation) -> DomainResult<Reservation> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let status = r.initial_status();
        let reservation = Reservation {
            id,
            user_id: r.user_id,
            date: r.date,
            time: r.time,
            people: r.people,
            comment: r.comment,
            status,
            created_at: now,
            updated_at: now,
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn list(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut list: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        list.sort_by_key(|r| (r.date, r.time, r.id));
        Ok(list)
    }

    async fn update_status(
        &self,
        id: i32,
        expected: ReservationStatus,
        next: ReservationStatus,
    ) -> DomainResult<Option<Reservation>> {
        // The shard write lock makes check-and-set atomic per id.
        let Some(mut entry) = self.reservations.get_mut(&id) else {
            return Ok(None);
        };
        if entry.status != expected {
            return Ok(None);
        }
        entry.status = next;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }
}

/// Repository provider that keeps everything in process memory.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    reservations: InMemoryReservationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}
