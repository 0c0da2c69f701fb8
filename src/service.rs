//! Query shaping for the climate endpoints
//!
//! [`ClimateService`] turns each request into one store call and reshapes the
//! rows into the JSON bodies the API returns. Store calls block, so every one
//! runs on the tokio blocking pool.

use crate::models::{DateRange, StationEntry, StatsResponse};
use crate::store::ClimateStore;
use crate::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, instrument};

/// Latest date in the dataset
pub const ANCHOR_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2017, 8, 23) {
    Some(date) => date,
    None => panic!("invalid anchor date"),
};

/// Length of the "last year" window ending at [`ANCHOR_DATE`]
pub const WINDOW_DAYS: u64 = 365;

/// Exclusive lower bound of the last-year queries, [`WINDOW_DAYS`] before
/// [`ANCHOR_DATE`]
pub const WINDOW_START: NaiveDate = match NaiveDate::from_ymd_opt(2016, 8, 23) {
    Some(date) => date,
    None => panic!("invalid window start"),
};

/// API paths advertised by the root route
pub const ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/start_date/<start_date>",
    "/api/v1.0/start_end_date/<start_date>/<end_date>",
];

/// [`WINDOW_START`] as `YYYY-MM-DD`.
#[must_use]
pub fn window_start() -> String {
    WINDOW_START.format("%Y-%m-%d").to_string()
}

/// HTML body listing the available API routes.
#[must_use]
pub fn route_listing() -> String {
    let mut body = String::from("Available Routes:<br/>");
    for route in ROUTES {
        body.push_str(route);
        body.push_str("<br/>");
    }
    body
}

/// Shapes store results into endpoint bodies. Cheap to clone; clones share
/// the store.
#[derive(Clone)]
pub struct ClimateService {
    store: Arc<dyn ClimateStore>,
}

impl ClimateService {
    pub fn new(store: Arc<dyn ClimateStore>) -> Self {
        Self { store }
    }

    async fn with_store<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ClimateStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || query(store.as_ref())).await?
    }

    /// Temperature observations of the last year keyed by date.
    ///
    /// Rows arrive in store order; when several rows share a date the one
    /// inserted last wins.
    #[instrument(skip(self))]
    pub async fn temperatures_by_date(&self) -> Result<BTreeMap<String, f64>> {
        let since = window_start();
        let rows = self
            .with_store(move |store| store.measurements_after(&since))
            .await?;

        let mut by_date = BTreeMap::new();
        for row in rows {
            by_date.insert(row.date, row.tobs);
        }
        debug!(dates = by_date.len(), "Collapsed observations by date");
        Ok(by_date)
    }

    #[instrument(skip(self))]
    pub async fn stations(&self) -> Result<Vec<StationEntry>> {
        self.with_store(|store| store.distinct_stations()).await
    }

    /// Every temperature observation of the last year, one per row.
    #[instrument(skip(self))]
    pub async fn temperature_observations(&self) -> Result<Vec<f64>> {
        let since = window_start();
        let rows = self
            .with_store(move |store| store.measurements_after(&since))
            .await?;
        Ok(rows.into_iter().map(|row| row.tobs).collect())
    }

    /// Stats for the rows dated exactly `start_date`.
    #[instrument(skip(self))]
    pub async fn stats_from(&self, start_date: String) -> Result<StatsResponse> {
        self.stats(DateRange::On(start_date)).await
    }

    /// Stats for the rows dated within `[start_date, end_date]`.
    #[instrument(skip(self))]
    pub async fn stats_between(&self, start_date: String, end_date: String) -> Result<StatsResponse> {
        self.stats(DateRange::Between(start_date, end_date)).await
    }

    async fn stats(&self, range: DateRange) -> Result<StatsResponse> {
        let lookup = range.clone();
        let stats = self
            .with_store(move |store| store.temperature_stats(&lookup))
            .await?;
        if stats.is_none() {
            debug!(?range, "No observations matched");
        }
        Ok(StatsResponse::from_lookup(stats, &range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurement, Station, TemperatureStats};
    use crate::ClimateError;

    /// In-memory store evaluating the same filters as the SQLite one.
    struct FixedStore {
        measurements: Vec<Measurement>,
        stations: Vec<Station>,
    }

    impl ClimateStore for FixedStore {
        fn measurements_after(&self, date: &str) -> Result<Vec<Measurement>> {
            Ok(self
                .measurements
                .iter()
                .filter(|m| m.date.as_str() > date)
                .cloned()
                .collect())
        }

        fn distinct_stations(&self) -> Result<Vec<StationEntry>> {
            let mut entries: Vec<StationEntry> = Vec::new();
            for entry in self.stations.iter().map(StationEntry::from) {
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
            Ok(entries)
        }

        fn temperature_stats(&self, range: &DateRange) -> Result<Option<TemperatureStats>> {
            let matched: Vec<f64> = self
                .measurements
                .iter()
                .filter(|m| match range {
                    DateRange::On(date) => &m.date == date,
                    DateRange::Between(start, end) => &m.date >= start && &m.date <= end,
                })
                .map(|m| m.tobs)
                .collect();
            if matched.is_empty() {
                return Ok(None);
            }
            let min = matched.iter().copied().fold(f64::INFINITY, f64::min);
            let max = matched.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = matched.iter().sum::<f64>() / matched.len() as f64;
            Ok(Some(TemperatureStats { min, max, avg }))
        }

        fn stations(&self) -> Result<Vec<Station>> {
            Ok(self.stations.clone())
        }

        fn count_measurements(&self) -> Result<u64> {
            Ok(self.measurements.len() as u64)
        }
    }

    struct BrokenStore;

    impl ClimateStore for BrokenStore {
        fn measurements_after(&self, _date: &str) -> Result<Vec<Measurement>> {
            Err(ClimateError::general("store offline"))
        }
        fn distinct_stations(&self) -> Result<Vec<StationEntry>> {
            Err(ClimateError::general("store offline"))
        }
        fn temperature_stats(&self, _range: &DateRange) -> Result<Option<TemperatureStats>> {
            Err(ClimateError::general("store offline"))
        }
        fn stations(&self) -> Result<Vec<Station>> {
            Err(ClimateError::general("store offline"))
        }
        fn count_measurements(&self) -> Result<u64> {
            Err(ClimateError::general("store offline"))
        }
    }

    fn service() -> ClimateService {
        let station = |id: &str, name: &str| Station {
            station: id.to_string(),
            name: name.to_string(),
            latitude: None,
            longitude: None,
            elevation: None,
        };
        ClimateService::new(Arc::new(FixedStore {
            measurements: vec![
                Measurement::new("USC00519397", "2016-08-22", None, 79.0),
                Measurement::new("USC00519397", "2016-08-23", Some(0.0), 81.0),
                Measurement::new("USC00519397", "2017-01-01", Some(0.29), 70.0),
                Measurement::new("USC00519281", "2017-01-01", None, 72.0),
                Measurement::new("USC00519397", "2017-08-23", Some(0.0), 81.0),
                Measurement::new("USC00519281", "2017-08-23", Some(0.45), 76.0),
                Measurement::new("USC00519281", "2017-01-01", Some(0.1), 68.0),
            ],
            stations: vec![
                station("USC00519397", "WAIKIKI 717.2, HI US"),
                station("USC00519281", "WAIHEE 837.5, HI US"),
                station("USC00519397", "WAIKIKI 717.2, HI US"),
            ],
        }))
    }

    #[test]
    fn test_window_start_is_one_year_before_anchor() {
        assert_eq!(
            ANCHOR_DATE.checked_sub_days(chrono::Days::new(WINDOW_DAYS)),
            Some(WINDOW_START)
        );
        assert_eq!(window_start(), "2016-08-23");
    }

    #[test]
    fn test_route_listing_names_every_route() {
        let body = route_listing();
        assert!(body.starts_with("Available Routes:<br/>"));
        for route in ROUTES {
            assert!(body.contains(&format!("{route}<br/>")));
        }
    }

    #[tokio::test]
    async fn test_duplicate_dates_keep_last_row() {
        let by_date = service().temperatures_by_date().await.unwrap();
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date["2017-01-01"], 68.0);
        assert_eq!(by_date["2017-08-23"], 76.0);
        assert!(by_date.keys().all(|date| date.as_str() > "2016-08-23"));
    }

    #[tokio::test]
    async fn test_observations_are_not_deduplicated() {
        let tobs = service().temperature_observations().await.unwrap();
        assert_eq!(tobs, vec![70.0, 72.0, 81.0, 76.0, 68.0]);
    }

    #[tokio::test]
    async fn test_stations_are_distinct_pairs() {
        let stations = service().stations().await.unwrap();
        assert_eq!(
            stations,
            vec![
                StationEntry::new("USC00519397", "WAIKIKI 717.2, HI US"),
                StationEntry::new("USC00519281", "WAIHEE 837.5, HI US"),
            ]
        );
    }

    #[tokio::test]
    async fn test_stats_from_known_date() {
        let response = service().stats_from("2017-08-23".to_string()).await.unwrap();
        let StatsResponse::Found(triples) = response else {
            panic!("expected stats for a known date");
        };
        let stats = triples[0];
        assert_eq!((stats.min, stats.max, stats.avg), (76.0, 81.0, 78.5));
        assert!(stats.min <= stats.avg && stats.avg <= stats.max);
    }

    #[tokio::test]
    async fn test_stats_from_unknown_date() {
        let response = service().stats_from("2099-01-01".to_string()).await.unwrap();
        assert_eq!(
            response,
            StatsResponse::NotFound {
                error: "Date: 2099-01-01 not found.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_inverted_range_is_not_found() {
        let response = service()
            .stats_between("2017-08-23".to_string(), "2016-08-23".to_string())
            .await
            .unwrap();
        assert_eq!(
            response,
            StatsResponse::NotFound {
                error: "Dates not found.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let service = ClimateService::new(Arc::new(BrokenStore));
        assert!(service.stations().await.is_err());
        assert!(service.temperatures_by_date().await.is_err());
    }
}
