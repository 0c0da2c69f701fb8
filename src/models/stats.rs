//! Aggregate temperature statistics and the date filters they run over

use serde::Serialize;
use serde::ser::{SerializeTuple, Serializer};

/// Date filter for an aggregate query. Dates are raw strings and are
/// compared lexicographically by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRange {
    /// Rows whose date equals the given date
    On(String),
    /// Rows whose date lies in `[start, end]`, both ends inclusive
    Between(String, String),
}

impl DateRange {
    /// SQL predicate over the `date` column, with positional parameters
    #[must_use]
    pub fn predicate(&self) -> &'static str {
        match self {
            DateRange::On(_) => "date = ?1",
            DateRange::Between(..) => "date >= ?1 AND date <= ?2",
        }
    }

    /// Values bound to the placeholders of [`DateRange::predicate`]
    #[must_use]
    pub fn params(&self) -> Vec<&str> {
        match self {
            DateRange::On(date) => vec![date.as_str()],
            DateRange::Between(start, end) => vec![start.as_str(), end.as_str()],
        }
    }

    /// Message returned to clients when no row matches
    #[must_use]
    pub fn not_found_message(&self) -> String {
        match self {
            DateRange::On(date) => format!("Date: {date} not found."),
            DateRange::Between(..) => "Dates not found.".to_string(),
        }
    }
}

/// `MIN`, `MAX` and `AVG` of `tobs`, serialized as `[min, max, avg]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl TemperatureStats {
    /// Builds stats from nullable aggregate columns. Any `None` means no row
    /// matched, so no stats exist.
    #[must_use]
    pub fn from_aggregates(min: Option<f64>, max: Option<f64>, avg: Option<f64>) -> Option<Self> {
        Some(Self {
            min: min?,
            max: max?,
            avg: avg?,
        })
    }
}

impl Serialize for TemperatureStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.min)?;
        tuple.serialize_element(&self.max)?;
        tuple.serialize_element(&self.avg)?;
        tuple.end()
    }
}

/// Body of the two stats endpoints: `[[min, max, avg]]` or `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Found(Vec<TemperatureStats>),
    NotFound { error: String },
}

impl StatsResponse {
    #[must_use]
    pub fn from_lookup(stats: Option<TemperatureStats>, range: &DateRange) -> Self {
        match stats {
            Some(stats) => StatsResponse::Found(vec![stats]),
            None => StatsResponse::NotFound {
                error: range.not_found_message(),
            },
        }
    }
}
