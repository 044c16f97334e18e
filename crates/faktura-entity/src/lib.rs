//! # faktura-entity
//!
//! Domain entity models for the Faktura session subsystem. Every struct in
//! this crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.

pub mod license;
pub mod session;
