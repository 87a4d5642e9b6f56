use super::init_tracing::DEFAULT_LOG_FILTER;

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn new(
        environment: impl Into<String>,
        level: impl Into<String>,
        json_format: bool,
    ) -> Self {
        Self {
            environment: environment.into(),
            level: level.into(),
            json_format,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            level: DEFAULT_LOG_FILTER.to_string(),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        }
    }
}
