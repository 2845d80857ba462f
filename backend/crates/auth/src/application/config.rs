//! Application Configuration
//!
//! Configuration for the Auth application layer.

/// Auth application configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Config with an application-wide pepper. An empty pepper means none.
    pub fn with_pepper(pepper: impl Into<Vec<u8>>) -> Self {
        let pepper = pepper.into();
        Self {
            password_pepper: (!pepper.is_empty()).then_some(pepper),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
