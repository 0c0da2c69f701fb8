//! Read-only access to the climate dataset
//!
//! The dataset is a SQLite file with a `measurement` and a `station` table.
//! [`ClimateStore`] is the seam the service talks to; [`SqliteStore`] opens a
//! fresh read-only connection for every call so no session is ever shared
//! between worker threads.

use crate::models::{DateRange, Measurement, Station, StationEntry, TemperatureStats};
use crate::{ClimateError, Result};
use rusqlite::{Connection, OpenFlags, Row, params, params_from_iter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

const REQUIRED_TABLES: [&str; 2] = ["measurement", "station"];

/// Queries the service needs from the dataset. Implementations block.
pub trait ClimateStore: Send + Sync {
    /// Measurements dated strictly after `date`, in store (rowid) order.
    fn measurements_after(&self, date: &str) -> Result<Vec<Measurement>>;

    /// Distinct `(station, name)` pairs in store order.
    fn distinct_stations(&self) -> Result<Vec<StationEntry>>;

    /// Min/max/avg of `tobs` over `range`, or `None` when nothing matches.
    fn temperature_stats(&self, range: &DateRange) -> Result<Option<TemperatureStats>>;

    /// Every station record.
    fn stations(&self) -> Result<Vec<Station>>;

    fn count_measurements(&self) -> Result<u64>;
}

/// SQLite-backed store using a connection per request
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Verifies the dataset exists and carries both tables.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ClimateError::dataset_missing(path, "file does not exist"));
        }

        let store = Self { path };
        let conn = store.connect()?;
        for table in REQUIRED_TABLES {
            let present: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )?;
            if !present {
                return Err(ClimateError::dataset_missing(
                    &store.path,
                    format!("missing table `{table}`"),
                ));
            }
        }

        info!(
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Opened climate dataset"
        );
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }
}

fn measurement_from_row(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    Ok(Measurement {
        station: row.get("station")?,
        date: row.get("date")?,
        prcp: row.get("prcp")?,
        tobs: row.get("tobs")?,
    })
}

fn station_from_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        station: row.get("station")?,
        name: row.get("name")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        elevation: row.get("elevation")?,
    })
}

impl ClimateStore for SqliteStore {
    #[instrument(level = "debug", skip(self))]
    fn measurements_after(&self, date: &str) -> Result<Vec<Measurement>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT station, date, prcp, tobs
             FROM measurement
             WHERE date > ?1
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![date], measurement_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = rows.len(), "Loaded measurements");
        Ok(rows)
    }

    #[instrument(level = "debug", skip(self))]
    fn distinct_stations(&self) -> Result<Vec<StationEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT DISTINCT station, name FROM station")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StationEntry {
                    station: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = rows.len(), "Loaded station listing");
        Ok(rows)
    }

    #[instrument(level = "debug", skip(self))]
    fn temperature_stats(&self, range: &DateRange) -> Result<Option<TemperatureStats>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement WHERE {}",
            range.predicate()
        );
        let (min, max, avg) = conn.query_row(&sql, params_from_iter(range.params()), |row| {
            Ok((
                row.get::<_, Option<f64>>(0)?,
                row.get::<_, Option<f64>>(1)?,
                row.get::<_, Option<f64>>(2)?,
            ))
        })?;
        Ok(TemperatureStats::from_aggregates(min, max, avg))
    }

    #[instrument(level = "debug", skip(self))]
    fn stations(&self) -> Result<Vec<Station>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT station, name, latitude, longitude, elevation FROM station")?;
        let rows = stmt
            .query_map([], station_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count_measurements(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM measurement", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
