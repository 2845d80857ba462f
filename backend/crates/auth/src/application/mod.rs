//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod register;

// Re-exports
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
