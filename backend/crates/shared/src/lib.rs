//! Shared Kernel
//!
//! Vocabulary used by every Blottr crate:
//! - Unified error type and HTTP status mapping
//! - Typed UUID identifiers
//! - Form validation primitives

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod validation;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
