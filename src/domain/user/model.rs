use chrono::{DateTime, Utc};

use crate::domain::principal::{Principal, Role};

/// Registered user
#[derive(Clone, Debug)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Administrator
        } else {
            Role::Customer
        }
    }

    /// The acting identity for requests made by this user.
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> User {
        User {
            id: 3,
            name: "Ann".into(),
            email: "ann@example.com".into(),
            password_hash: String::new(),
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn role_follows_admin_flag() {
        assert_eq!(user(false).role(), Role::Customer);
        assert_eq!(user(true).role(), Role::Administrator);
    }

    #[test]
    fn principal_carries_id_and_role() {
        let p = user(true).principal();
        assert_eq!(p.user_id, 3);
        assert!(p.is_admin());
    }
}
