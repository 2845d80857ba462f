//! API DTOs (Data Transfer Objects)
//!
//! Request fields default to empty strings so that a missing field is reported
//! by `Validate` as a field error instead of a JSON rejection.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::validation::{Validate, ValidationErrors, check_email, check_length};
use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::display_name::{DISPLAY_NAME_MAX_LENGTH, DISPLAY_NAME_MIN_LENGTH};
use crate::domain::value_object::user_password::policy_message;
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    /// `client` or `artist`
    pub role: String,
}

impl RegisterRequest {
    /// Role after validation; `Client` when unrecognized
    pub fn user_role(&self) -> UserRole {
        UserRole::from_code(self.role.trim()).unwrap_or_default()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_length(
            &mut errors,
            "displayName",
            "Display name",
            &self.display_name,
            DISPLAY_NAME_MIN_LENGTH,
            DISPLAY_NAME_MAX_LENGTH,
        );
        check_email(&mut errors, "email", &self.email);

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if let Err(e) = ClearTextPassword::new(self.password.clone()) {
            errors.add("password", policy_message(&e));
        }

        if self.password_confirmation != self.password {
            errors.add("passwordConfirmation", "Passwords do not match");
        }

        if UserRole::from_code(self.role.trim()).is_none() {
            errors.add("role", "Role must be either client or artist");
        }

        errors.into_result()
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_email(&mut errors, "email", &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        errors.into_result()
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            display_name: user.display_name.to_string(),
            email: user.email.to_string(),
            role: user.user_role,
            created_at: user.created_at,
        }
    }
}

/// Register/login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserDto,
}

impl AuthResponse {
    pub fn new(user: &User) -> Self {
        Self {
            success: true,
            user: user.into(),
        }
    }
}
