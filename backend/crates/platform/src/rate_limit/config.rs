//! Rate limit configuration

use std::time::Duration;
use thiserror::Error;

/// Default maximum admitted requests per window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length (15 minutes)
pub const DEFAULT_WINDOW_MS: u64 = 15 * 60 * 1000;

/// Longest accepted window (365 days)
pub const MAX_WINDOW_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Default rejection message
pub const DEFAULT_MESSAGE: &str = "Too many requests, please try again later.";

/// Invalid per-route limiter arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitConfigError {
    #[error("Invalid rate limit argument `{name}`: {value:?} is not a positive integer in range")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Too many rate limit arguments: expected at most 2, got {0}")]
    TooManyArguments(usize),
}

/// Per-route rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum admitted requests in one window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
    /// Refund quota for responses with status < 400
    pub skip_successful_requests: bool,
    /// Refund quota for responses with status >= 400
    pub skip_failed_requests: bool,
    /// Message placed in the 429 body
    pub message: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: Duration::from_millis(DEFAULT_WINDOW_MS),
            skip_successful_requests: false,
            skip_failed_requests: false,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            ..Self::default()
        }
    }

    /// Build from ordered route arguments: `[max, windowMs]`.
    ///
    /// Missing arguments keep their defaults. Blank arguments count as missing.
    ///
    /// ```
    /// use platform::rate_limit::RateLimitConfig;
    ///
    /// let config = RateLimitConfig::from_route_args(&["5", "60000"]).unwrap();
    /// assert_eq!(config.max_requests, 5);
    /// assert_eq!(config.window_ms(), 60_000);
    /// ```
    pub fn from_route_args<S: AsRef<str>>(args: &[S]) -> Result<Self, RateLimitConfigError> {
        if args.len() > 2 {
            return Err(RateLimitConfigError::TooManyArguments(args.len()));
        }

        let mut config = Self::default();

        if let Some(max) = args.first().map(AsRef::as_ref).filter(|s| !s.trim().is_empty()) {
            config.max_requests = parse_positive(max, "max")?
                .try_into()
                .map_err(|_| RateLimitConfigError::InvalidNumber {
                    name: "max",
                    value: max.to_string(),
                })?;
        }

        if let Some(window) = args.get(1).map(AsRef::as_ref).filter(|s| !s.trim().is_empty()) {
            let window_ms = parse_positive(window, "windowMs")?;
            if window_ms > MAX_WINDOW_MS {
                return Err(RateLimitConfigError::InvalidNumber {
                    name: "windowMs",
                    value: window.to_string(),
                });
            }
            config.window = Duration::from_millis(window_ms);
        }

        Ok(config)
    }

    /// Parse a comma separated `max[,windowMs]` spec, as found in env vars
    pub fn from_spec(spec: &str) -> Result<Self, RateLimitConfigError> {
        let args: Vec<&str> = spec.split(',').map(str::trim).collect();
        Self::from_route_args(&args)
    }

    pub fn with_skip_successful_requests(mut self, skip: bool) -> Self {
        self.skip_successful_requests = skip;
        self
    }

    pub fn with_skip_failed_requests(mut self, skip: bool) -> Self {
        self.skip_failed_requests = skip;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Window length in ms, saturating at `i64::MAX`
    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }

    /// Whether a response with this status gives its quota back
    pub fn refunds(&self, status: u16) -> bool {
        if status >= 400 {
            self.skip_failed_requests
        } else {
            self.skip_successful_requests
        }
    }
}

fn parse_positive(value: &str, name: &'static str) -> Result<u64, RateLimitConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RateLimitConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
