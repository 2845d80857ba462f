//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ContactAppState;
pub use router::{inbox_router, submission_router};
