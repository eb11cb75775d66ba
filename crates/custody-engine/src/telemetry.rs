//! Tracing subscriber setup.

use custody_types::{LedgerError, LoggingConfig, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the filter: `RUST_LOG` if set, else the configured directive.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            LedgerError::Configuration(format!("bad log filter {:?}: {e}", config.filter))
        }),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        let cfg = LoggingConfig::default();
        assert!(init(&cfg).is_ok());
        assert!(init(&cfg).is_ok());
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(&LoggingConfig::default().filter).is_ok());
    }
}
