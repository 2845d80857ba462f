//! Display Name Value Object
//!
//! Name shown on an artist profile or next to a client's contact requests.
//! NFKC-normalized and trimmed; inner whitespace runs collapse to one space.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length in characters, after normalization
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;

/// Maximum length in characters, after normalization
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let name = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request(
                "Display name contains invalid characters",
            ));
        }

        let len = name.chars().count();
        if len < DISPLAY_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Display name must be at least {} characters",
                DISPLAY_NAME_MIN_LENGTH
            )));
        }
        if len > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Display name must be at most {} characters",
                DISPLAY_NAME_MAX_LENGTH
            )));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
