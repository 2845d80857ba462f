//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration with email + password as a client or an artist
//! - Login by email; unknown email and wrong password are indistinguishable
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional application pepper
//! - Both endpoints sit behind the per-route rate limiter in the API binary

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::UserRepository;
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryUserRepository, PgUserRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
