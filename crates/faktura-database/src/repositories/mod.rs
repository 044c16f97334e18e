//! Concrete repository implementations.

pub mod license;
pub mod session;

pub use license::LicenseRepository;
pub use session::SessionRepository;
