//! Value Object Module

pub mod display_name;
pub mod email;
pub mod user_password;
pub mod user_role;

pub use display_name::DisplayName;
pub use email::Email;
pub use kernel::id::UserId;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
