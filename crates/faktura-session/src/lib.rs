//! # faktura-session
//!
//! Session admission and liveness tracking for Faktura. Enforces a
//! license-defined cap on simultaneously logged-in sessions per account,
//! across independent client processes that coordinate only through the
//! shared backing store.
//!
//! Components, leaves first:
//! - [`store::SessionStore`] — persistence primitives over session records,
//!   with Postgres and in-memory backends.
//! - [`license::LicenseRegistry`] — read-only license lookups and derived
//!   queries (seat cap, validity, days remaining).
//! - [`reaper::Reaper`] — deletes records whose liveness expired, for any
//!   account.
//! - [`admission::AdmissionController`] — decides whether a new login may
//!   acquire a seat.
//! - [`heartbeat::HeartbeatEmitter`] — periodically renews liveness for an
//!   admitted session.
//! - [`orchestrator::SessionLifecycleOrchestrator`] — binds identity-provider
//!   events to the above; the rest of the application depends on this.

pub mod admission;
pub mod heartbeat;
pub mod license;
pub mod orchestrator;
pub mod reaper;
pub mod store;

pub use admission::{AdmissionController, AdmissionDecision};
pub use heartbeat::{HeartbeatEmitter, HeartbeatHandle};
pub use license::LicenseRegistry;
pub use orchestrator::{SessionLifecycleOrchestrator, SessionState};
pub use reaper::Reaper;
pub use store::SessionStore;
