//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::{ClimateError, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directives for `level`, used when `RUST_LOG` is unset.
#[must_use]
pub fn default_directives(level: &str) -> String {
    format!("climate_query={level},tower_http={level}")
}

/// Installs the global subscriber. Fails instead of panicking when one is
/// already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|err| ClimateError::general(format!("Failed to initialise logging: {err}")))?;
    tracing::debug!("Logging initialized at level: {}", config.level);
    Ok(())
}
