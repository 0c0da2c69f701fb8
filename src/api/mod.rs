use std::collections::BTreeMap;

use axum::{
    Router,
    extract::{Path, State},
    response::{Html, Json},
    routing::get,
};

use crate::{
    ClimateError,
    models::{StationEntry, StatsResponse},
    service::{ClimateService, route_listing},
};

pub fn router(service: ClimateService) -> Router {
    Router::new()
        .route("/", get(list_routes))
        .route("/api/v1.0/precipitation", get(get_precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/tobs", get(get_tobs))
        .route("/api/v1.0/start_date/{start_date}", get(get_start_date))
        .route(
            "/api/v1.0/start_end_date/{start_date}/{end_date}",
            get(get_start_end_date),
        )
        .with_state(service)
}

async fn list_routes() -> Html<String> {
    Html(route_listing())
}

async fn get_precipitation(
    State(service): State<ClimateService>,
) -> Result<Json<BTreeMap<String, f64>>, ClimateError> {
    Ok(Json(service.temperatures_by_date().await?))
}

async fn get_stations(
    State(service): State<ClimateService>,
) -> Result<Json<Vec<StationEntry>>, ClimateError> {
    Ok(Json(service.stations().await?))
}

async fn get_tobs(State(service): State<ClimateService>) -> Result<Json<Vec<f64>>, ClimateError> {
    Ok(Json(service.temperature_observations().await?))
}

async fn get_start_date(
    State(service): State<ClimateService>,
    Path(start_date): Path<String>,
) -> Result<Json<StatsResponse>, ClimateError> {
    Ok(Json(service.stats_from(start_date).await?))
}

async fn get_start_end_date(
    State(service): State<ClimateService>,
    Path((start_date, end_date)): Path<(String, String)>,
) -> Result<Json<StatsResponse>, ClimateError> {
    Ok(Json(service.stats_between(start_date, end_date).await?))
}
