//! Tracing subscriber setup for hosts embedding the console.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};
use crate::error::{AdminError, AdminResult};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` from the environment wins over the configured level. Calling this
/// twice returns a configuration error instead of panicking.
pub fn init_tracing(config: &LogConfig) -> AdminResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| AdminError::Configuration(format!("tracing already initialised: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        let err = init_tracing(&config).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
