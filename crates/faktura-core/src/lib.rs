//! # faktura-core
//!
//! Core crate for the Faktura session subsystem. Contains configuration
//! schemas, typed identifiers, auth state events, collaborator traits,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Faktura crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
