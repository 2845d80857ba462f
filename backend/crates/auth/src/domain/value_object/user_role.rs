use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    /// Looks for an artist and sends contact requests
    #[default]
    Client = 0,
    /// Receives and answers contact requests
    Artist = 1,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Artist => "artist",
        }
    }

    #[inline]
    pub const fn is_artist(&self) -> bool {
        matches!(self, UserRole::Artist)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(UserRole::Client),
            1 => Some(UserRole::Artist),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "client" => Some(UserRole::Client),
            "artist" => Some(UserRole::Artist),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
