//! Domain events consumed by the session subsystem.

pub mod auth;

pub use auth::AuthStateEvent;
