//! User Password Value Object
//!
//! Domain wrappers around `platform::password`: `RawPassword` for what the
//! user typed, `UserPassword` for the stored Argon2id hash.

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password chosen at registration; the policy applies
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw)
            .map_err(|e| AppError::bad_request(policy_message(&e)))?;

        Ok(Self(clear_text))
    }

    /// Password typed at login; only normalized
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_login(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

/// User-facing wording for a policy violation
pub fn policy_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::TooShort { min, .. } => {
            format!("Password must be at least {min} characters")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            format!("Password must be at most {max} characters")
        }
        PasswordPolicyError::EmptyOrWhitespace => "Password is required".to_string(),
        PasswordPolicyError::InvalidCharacter => {
            "Password contains invalid characters".to_string()
        }
        PasswordPolicyError::CommonPattern => {
            "Password is too common or follows a predictable pattern".to_string()
        }
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated raw password. `pepper` is the application-wide secret.
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw.inner().hash(pepper).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AppError::internal(format!("Password hashing failed: {}", msg))
            }
            PasswordHashError::InvalidHashFormat => {
                AppError::internal("Unexpected error during password hashing")
            }
        })?;

        Ok(Self(hashed))
    }

    /// Load the hash stored in the database
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string).map_err(|_| {
            AppError::new(
                ErrorKind::InternalServerError,
                "Invalid password hash in database",
            )
        })?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time check; `pepper` must match the one used when hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
