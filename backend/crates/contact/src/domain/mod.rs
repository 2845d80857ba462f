//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::contact_request::ContactRequest;
pub use repository::ContactRequestRepository;
