//! # unga-core
//!
//! Configuration, paths, and reference data shared by the UNGA speech store.
//!
//! - **Configuration**: Loading, validation, and environment overrides
//! - **Reference data**: Country codes, regions, AU membership, SDG keywords
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod reference;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use reference::{Classification, CountryInfo};
