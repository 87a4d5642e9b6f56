use ephemera::infrastructure::observability::{
    DEFAULT_LOG_FILTER, FilterSource, TracingConfig, resolve_filter,
};

#[test]
fn given_default_config_when_created_then_uses_crate_filter() {
    let config = TracingConfig::default();

    assert_eq!(config.level, DEFAULT_LOG_FILTER);
    assert!(!config.environment.is_empty());
}

#[test]
fn given_explicit_values_when_creating_then_they_are_kept() {
    let config = TracingConfig::new("prod", "warn", true);

    assert_eq!(config.environment, "prod");
    assert_eq!(config.level, "warn");
    assert!(config.json_format);
}

#[test]
fn given_default_filter_when_inspected_then_targets_this_crate() {
    assert!(DEFAULT_LOG_FILTER.contains("ephemera=debug"));
    assert!(DEFAULT_LOG_FILTER.contains("tower_http=debug"));
}

#[test]
fn given_rust_log_when_resolving_filter_then_it_wins_over_settings() {
    let (filter, source) = resolve_filter(Some("warn"), "debug");

    assert_eq!(source, FilterSource::RustLog);
    assert_eq!(filter.to_string(), "warn");
}

#[test]
fn given_blank_rust_log_when_resolving_filter_then_settings_are_used() {
    let (filter, source) = resolve_filter(Some("  "), "info,ephemera=trace");

    assert_eq!(source, FilterSource::Settings);
    assert!(filter.to_string().contains("ephemera=trace"));
}

#[test]
fn given_nothing_configured_when_resolving_filter_then_falls_back_to_default() {
    let (_filter, source) = resolve_filter(None, "");

    assert_eq!(source, FilterSource::Default);
    assert_eq!(source.to_string(), "default");
}
