//! Station records and the `[id, name]` listing entry

use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde::Deserialize;

/// A monitoring station from the `station` table
#[derive(Debug, serde::Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// Unique station code, e.g. `USC00519397`
    pub station: String,
    /// Display name
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// Distinct `(station, name)` pair, serialized as a two-element array
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationEntry {
    pub station: String,
    pub name: String,
}

impl StationEntry {
    #[must_use]
    pub fn new(station: &str, name: &str) -> Self {
        Self {
            station: station.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<&Station> for StationEntry {
    fn from(station: &Station) -> Self {
        Self::new(&station.station, &station.name)
    }
}

impl Serialize for StationEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.station)?;
        tuple.serialize_element(&self.name)?;
        tuple.end()
    }
}
