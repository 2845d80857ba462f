//! Password Hashing and Verification
//!
//! Argon2id hashing with an optional application pepper. Clear text is
//! NFKC-normalized, checked against a small policy and zeroized on drop.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Minimum password length in code points
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in code points
pub const MAX_PASSWORD_LENGTH: usize = 128;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "motdepasse",
    "azertyuiop",
    "qwertyuiop",
    "12345678",
    "123456789",
    "1234567890",
    "abcdefgh",
    "iloveyou",
    "letmein1",
    "welcome1",
    "tattoo123",
    "tattoos1",
    "blottr123",
];

const KEYBOARD_RUNS: &[&str] = &["azerty", "qwerty", "qsdfgh", "asdfgh", "wxcvbn", "zxcvbn"];

/// Password policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty")]
    EmptyOrWhitespace,

    #[error("Password contains control characters")]
    InvalidCharacter,

    #[error("Password is too common")]
    CommonPattern,
}

/// Hashing/verification failures
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Clear text password, zeroized on drop. Not `Clone`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize and check a password chosen at registration
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw);
        let normalized: String = raw.nfkc().collect();
        let password = Self(normalized);

        if password.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = password.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password.0.chars().any(|c| c.is_control() && c != '\t') {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(&password.0) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(password)
    }

    /// Normalize a password typed at login. No policy is applied so that
    /// accounts created under an older policy can still sign in.
    pub fn for_login(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Argon2id hash in PHC format
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Argon2id hash in PHC string format, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Load a stored hash, rejecting anything that is not a PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time verification; `pepper` must match the one used to hash
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_digit_run(&lower) {
        return true;
    }

    if KEYBOARD_RUNS.iter().any(|run| lower.contains(run)) {
        return true;
    }

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Only digits, and each digit follows the previous one up or down
fn is_digit_run(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().map(|c| c.to_digit(10)).collect::<Option<_>>().unwrap_or_default();
    if digits.len() < 4 {
        return false;
    }

    let ascending = digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits.windows(2).all(|w| w[0] == (w[1] + 1) % 10);
    ascending || descending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("Ink#12".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 6 }
        );
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("Xk7#".repeat(40));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("          ".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::EmptyOrWhitespace);
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("Needle\u{0007}Work9".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_password_common_patterns() {
        for weak in ["password123", "azertyuiop", "Qwerty2024!", "12345678", "98765432", "zzzzzzzz"] {
            assert_eq!(
                ClearTextPassword::new(weak.to_string()).unwrap_err(),
                PasswordPolicyError::CommonPattern,
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_valid_passwords() {
        assert!(ClearTextPassword::new("Blackwork-Sleeve-42".to_string()).is_ok());
        assert!(ClearTextPassword::new("tatouage été 2024".to_string()).is_ok());
    }

    #[test]
    fn test_nfkc_normalization_matches_at_login() {
        // Fullwidth digits normalize to ASCII digits
        let registered = ClearTextPassword::new("Fineline\u{FF11}\u{FF12}\u{FF13}".to_string()).unwrap();
        let hashed = registered.hash(None).unwrap();

        let typed = ClearTextPassword::for_login("Fineline123".to_string());
        assert!(hashed.verify(&typed, None));
    }

    #[test]
    fn test_hash_and_verify_with_pepper() {
        let password = ClearTextPassword::new("Dotwork-Mandala-7".to_string()).unwrap();
        let hashed = password.hash(Some(b"pepper")).unwrap();

        assert!(hashed.verify(&password, Some(b"pepper")));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&ClearTextPassword::for_login("wrong".to_string()), Some(b"pepper")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::new("Neo-Traditional-9".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.as_phc_string().starts_with("$argon2id$"));
        assert!(restored.verify(&password, None));
        assert!(HashedPassword::from_phc_string("plaintext").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_login("secret-ink".to_string());
        let debug = format!("{:?}", password);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret-ink"));
    }
}
