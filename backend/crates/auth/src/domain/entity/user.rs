//! User Entity
//!
//! A registered client or artist, with the credentials used to log in.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::UserPassword, user_role::UserRole,
};
use kernel::id::UserId;

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lowercased
    pub email: Email,
    pub display_name: DisplayName,
    pub user_role: UserRole,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        email: Email,
        display_name: DisplayName,
        user_role: UserRole,
        password_hash: UserPassword,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            display_name,
            user_role,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_artist(&self) -> bool {
        self.user_role.is_artist()
    }
}
