use gosling_common::{Error, Result};
use gosling_config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter from `RUST_LOG` if set, else `env_filter`, else `level`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = config.env_filter.as_deref().unwrap_or(&config.level);
    EnvFilter::try_new(directive)
        .map_err(|e| Error::Config(format!("invalid log filter {directive:?}: {e}")))
}

/// Install the global tracing subscriber. Fails if one is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
    installed.map_err(|e| Error::Config(format!("failed to install tracing subscriber: {e}")))
}
