//! Session record persistence.
//!
//! The store trait is implemented by:
//! - a PostgreSQL backend (production)
//! - an in-memory mutex-guarded map (tests, single-process tools)

pub mod backend;
pub mod memory;
pub mod postgres;

pub use backend::SessionStore;
pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;
