use std::fmt;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt as fmt_layer};

use super::TracingConfig;

pub const DEFAULT_LOG_FILTER: &str = "info,ephemera=debug,tower_http=debug";

/// Where the active log filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    RustLog,
    Settings,
    Default,
}

impl FilterSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterSource::RustLog => "RUST_LOG",
            FilterSource::Settings => "settings",
            FilterSource::Default => "default",
        }
    }
}

impl fmt::Display for FilterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `RUST_LOG` wins over the configured level; an unparsable value falls
/// through to the next candidate.
pub fn resolve_filter(rust_log: Option<&str>, configured: &str) -> (EnvFilter, FilterSource) {
    if let Some(filter) = rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
    {
        return (filter, FilterSource::RustLog);
    }
    if !configured.trim().is_empty()
        && let Ok(filter) = EnvFilter::try_new(configured)
    {
        return (filter, FilterSource::Settings);
    }
    (EnvFilter::new(DEFAULT_LOG_FILTER), FilterSource::Default)
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TryInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (env_filter, source) = resolve_filter(rust_log.as_deref(), &config.level);
    let filter = env_filter.to_string();

    let json = config.json_format.then(|| {
        fmt_layer::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });
    let plain = (!config.json_format).then(|| {
        fmt_layer::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(plain)
        .try_init()?;

    tracing::info!(
        environment = %config.environment,
        json_format = config.json_format,
        filter = %filter,
        filter_source = %source,
        "Tracing initialized"
    );
    Ok(())
}
