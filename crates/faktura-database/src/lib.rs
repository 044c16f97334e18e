//! # faktura-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for the Faktura session subsystem.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
