use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter for the configured level. Environment overrides are already folded
/// into `config.level` by the time this runs.
pub fn filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::try_new(&config.level)?)
}

/// Installs the global subscriber.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let registry = Registry::default().with(filter(config)?);
    if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }

    tracing::info!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}
