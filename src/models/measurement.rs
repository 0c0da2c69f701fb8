//! Measurement record: one temperature/precipitation observation

use serde::{Deserialize, Serialize};

/// A single station/date reading from the `measurement` table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Measurement {
    /// Identifier of the reporting station
    pub station: String,
    /// Observation date as `YYYY-MM-DD`
    pub date: String,
    /// Precipitation, absent for some readings
    pub prcp: Option<f64>,
    /// Observed temperature
    pub tobs: f64,
}

impl Measurement {
    #[must_use]
    pub fn new(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Self {
        Self {
            station: station.to_string(),
            date: date.to_string(),
            prcp,
            tobs,
        }
    }
}
