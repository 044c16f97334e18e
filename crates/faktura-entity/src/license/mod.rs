//! License domain entities.

pub mod model;

pub use model::LicenseRecord;
