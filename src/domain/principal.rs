//! Acting identity and the single authorization check for reservation operations.

use super::reservation::Reservation;
use super::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Administrator => "administrator",
        }
    }
}

/// Operations a principal may attempt against reservations.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    Create,
    ListOwn,
    ListAll,
    Confirm,
    Cancel(&'a Reservation),
    /// Any route under the administrator surface
    Administer,
}

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    pub fn authorize(&self, action: Action<'_>) -> DomainResult<()> {
        match (self.role, action) {
            (Role::Administrator, _) => Ok(()),
            (Role::Customer, Action::Create | Action::ListOwn) => Ok(()),
            (Role::Customer, Action::Cancel(r)) if r.user_id == self.user_id => Ok(()),
            (Role::Customer, Action::Cancel(_)) => Err(DomainError::Authorization(
                "user cannot modify this reservation".into(),
            )),
            (Role::Customer, Action::Confirm | Action::ListAll | Action::Administer) => {
                Err(DomainError::Authorization("administrator role required".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::ReservationStatus;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn owned_by(user_id: i32) -> Reservation {
        Reservation {
            id: 1,
            user_id,
            date: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            people: 2,
            comment: None,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn customer_may_create_and_list_own() {
        let p = Principal::new(1, Role::Customer);
        assert!(p.authorize(Action::Create).is_ok());
        assert!(p.authorize(Action::ListOwn).is_ok());
    }

    #[test]
    fn customer_cannot_confirm_or_list_all() {
        let p = Principal::new(1, Role::Customer);
        assert!(matches!(p.authorize(Action::Confirm), Err(DomainError::Authorization(_))));
        assert!(matches!(p.authorize(Action::ListAll), Err(DomainError::Authorization(_))));
        assert!(matches!(p.authorize(Action::Administer), Err(DomainError::Authorization(_))));
    }

    #[test]
    fn customer_cancels_only_own_reservation() {
        let p = Principal::new(1, Role::Customer);
        assert!(p.authorize(Action::Cancel(&owned_by(1))).is_ok());
        assert!(matches!(
            p.authorize(Action::Cancel(&owned_by(2))),
            Err(DomainError::Authorization(_))
        ));
    }

    #[test]
    fn administrator_may_do_everything() {
        let p = Principal::new(9, Role::Administrator);
        let r = owned_by(1);
        for action in [
            Action::Create,
            Action::ListOwn,
            Action::ListAll,
            Action::Confirm,
            Action::Cancel(&r),
            Action::Administer,
        ] {
            assert!(p.authorize(action).is_ok());
        }
    }
}
