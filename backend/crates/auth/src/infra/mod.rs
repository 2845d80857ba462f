//! Infrastructure Layer
//!
//! Database implementations and the in-memory store used without
//! `DATABASE_URL` and in tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;
