//! Value Object Module

pub mod contact_status;
pub mod phone;

pub use contact_status::ContactStatus;
pub use kernel::id::ContactRequestId;
pub use phone::PhoneNumber;
