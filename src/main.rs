use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use climate_query::{
    ClimateConfig, ClimateService, ClimateStore, SqliteStore, VERSION, logging, web,
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Optional first argument: path of a TOML config file
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ClimateConfig::load_from_path(config_path)?;
    logging::init_logging(&config.logging)?;

    tracing::info!(version = VERSION, "Starting climate query service");

    let store = SqliteStore::open(&config.database.path)
        .with_context(|| "Failed to open climate dataset")?;
    tracing::info!(
        path = %store.path().display(),
        stations = store.stations()?.len(),
        measurements = store.count_measurements()?,
        "Dataset loaded"
    );

    let service = ClimateService::new(Arc::new(store));
    web::run(&config.server, service).await
}
