use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a contact request: `pending`, then `accepted` or `declined`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ContactStatus {
    #[default]
    Pending = 0,
    Accepted = 1,
    Declined = 2,
}

impl ContactStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Accepted => "accepted",
            ContactStatus::Declined => "declined",
        }
    }

    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, ContactStatus::Pending)
    }

    /// Whether an artist may answer with this status
    #[inline]
    pub const fn is_response(&self) -> bool {
        matches!(self, ContactStatus::Accepted | ContactStatus::Declined)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(ContactStatus::Pending),
            1 => Some(ContactStatus::Accepted),
            2 => Some(ContactStatus::Declined),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(ContactStatus::Pending),
            "accepted" => Some(ContactStatus::Accepted),
            "declined" => Some(ContactStatus::Declined),
            _ => None,
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for status in [
            ContactStatus::Pending,
            ContactStatus::Accepted,
            ContactStatus::Declined,
        ] {
            assert_eq!(ContactStatus::from_code(status.code()), Some(status));
            assert_eq!(ContactStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ContactStatus::from_code("cancelled"), None);
        assert_eq!(ContactStatus::from_id(9), None);
    }

    #[test]
    fn test_response_statuses() {
        assert!(!ContactStatus::Pending.is_response());
        assert!(ContactStatus::Accepted.is_response());
        assert!(ContactStatus::Declined.is_response());
    }
}
