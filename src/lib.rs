//! Climate Query - read-only JSON API over a static climate dataset
//!
//! This library holds the typed records of the dataset, the SQLite store
//! that queries them, and the axum routes that shape the results as JSON.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use config::ClimateConfig;
pub use error::ClimateError;
pub use models::{DateRange, Measurement, Station, StationEntry, StatsResponse, TemperatureStats};
pub use service::ClimateService;
pub use store::{ClimateStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
