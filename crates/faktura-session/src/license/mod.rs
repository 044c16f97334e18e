//! License lookups and derived seat-cap queries.

pub mod directory;
pub mod memory;
pub mod postgres;
pub mod registry;

pub use directory::LicenseDirectory;
pub use memory::MemoryLicenseDirectory;
pub use postgres::PgLicenseDirectory;
pub use registry::LicenseRegistry;
