//! Data models for the climate query service
//!
//! - Measurement: one temperature/precipitation reading
//! - Station: monitoring site metadata and its `[id, name]` listing entry
//! - Stats: aggregate temperature statistics and their date filters

pub mod measurement;
pub mod station;
pub mod stats;

// Re-export all public types for convenient access
pub use measurement::Measurement;
pub use station::{Station, StationEntry};
pub use stats::{DateRange, StatsResponse, TemperatureStats};
