//! Rate Limiting
//!
//! Fixed-window request counters keyed by client address and route pattern.
//!
//! - [`config`]: per-route limits and skip accounting
//! - [`clock`]: injectable time source
//! - [`store`]: storage trait and the in-process store
//! - [`middleware`]: axum middleware enforcing the limit

pub mod clock;
pub mod config;
pub mod middleware;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RateLimitConfig, RateLimitConfigError};
pub use middleware::{RateLimitRejection, RateLimitState, rate_limit};
pub use store::{
    LocalRateLimitStore, MemoryRateLimitStore, RateLimitEntry, RateLimitError, RateLimitResult,
    RateLimitStore,
};
