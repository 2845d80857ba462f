//! Phone Number Value Object
//!
//! Free-form as typed by the client (`+33 6 12 34 56 78`, `(555) 010-0199`);
//! only the character set and length are checked.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PHONE_MIN_LENGTH: usize = 6;
pub const PHONE_MAX_LENGTH: usize = 20;

const ALLOWED_SYMBOLS: &[char] = &[' ', '+', '-', '(', ')', '.'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let phone = raw.as_ref().trim();
        if !Self::is_valid(phone) {
            return Err(AppError::bad_request("Phone number is invalid"));
        }
        Ok(Self(phone.to_string()))
    }

    /// Length and character set check on trimmed input
    pub fn is_valid(phone: &str) -> bool {
        let len = phone.chars().count();
        (PHONE_MIN_LENGTH..=PHONE_MAX_LENGTH).contains(&len)
            && phone
                .chars()
                .all(|c| c.is_ascii_digit() || ALLOWED_SYMBOLS.contains(&c))
            && phone.chars().any(|c| c.is_ascii_digit())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phones() {
        assert!(PhoneNumber::new("+33 6 12 34 56 78").is_ok());
        assert!(PhoneNumber::new("(555) 010-0199").is_ok());
        assert!(PhoneNumber::new("06.12.34.56.78").is_ok());
        assert_eq!(PhoneNumber::new("  0612345678 ").unwrap().as_str(), "0612345678");
    }

    #[test]
    fn test_invalid_phones() {
        assert!(PhoneNumber::new("12345").is_err());
        assert!(PhoneNumber::new("0".repeat(21)).is_err());
        assert!(PhoneNumber::new("06 12 AB 56 78").is_err());
        assert!(PhoneNumber::new("+-() .").is_err());
    }
}
