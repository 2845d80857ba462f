//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the Blottr backend:
//! - Rate limiting (fixed window, per client and route)
//! - Request monitoring middleware and metric collectors
//! - Client address resolution
//! - Password hashing (Argon2id)

pub mod client;
pub mod monitoring;
pub mod password;
pub mod rate_limit;
