//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryContactRequestRepository;
pub use postgres::PgContactRequestRepository;
