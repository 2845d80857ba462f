//! Contact Requests Backend Module
//!
//! A client asks an artist for a tattoo: placement, budget and a message.
//! The artist accepts or declines; a request is answered once.
//!
//! Same layering as `auth`:
//! - `domain/` - `ContactRequest` entity, status transitions, repository trait
//! - `application/` - Submit, get, list and respond use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs with validation, routers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use domain::repository::ContactRequestRepository;
pub use error::{ContactError, ContactResult};
pub use infra::{MemoryContactRequestRepository, PgContactRequestRepository};
pub use presentation::handlers::ContactAppState;
pub use presentation::router::{inbox_router, submission_router};
