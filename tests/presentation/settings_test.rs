use std::collections::HashMap;
use std::time::Duration;

use config::{Config, File, FileFormat};

use ephemera::presentation::Settings;
use ephemera::presentation::config::ProviderSettings;

#[test]
fn given_no_configuration_when_defaulting_then_matches_service_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.storage.max_size_bytes(), 95 * 1024 * 1024);
    assert!(!settings.storage.wipe_on_startup);
    assert_eq!(settings.storage.delete_retry_delay(), Duration::from_millis(500));
    assert_eq!(settings.janitor.interval(), Duration::from_secs(3600));
    assert_eq!(settings.janitor.max_age(), Duration::from_secs(3600));
    assert_eq!(settings.streaming.chunk_size_bytes, 1024 * 1024);
    assert_eq!(settings.streaming.cleanup_grace(), Duration::from_millis(500));
    assert_eq!(settings.providers.download_timeout_secs, 180);
    assert_eq!(settings.providers.tts_default_language, "en");
    assert!(settings.providers.flux_api_key.is_none());
}

#[test]
fn given_partial_file_when_deserializing_then_unset_fields_keep_defaults() {
    let toml = r#"
        [server]
        port = 8080

        [storage]
        max_size_mb = 10

        [providers]
        grok_api_key = "xai-test"
    "#;

    let settings: Settings = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.storage.max_size_bytes(), 10 * 1024 * 1024);
    assert_eq!(settings.providers.grok_api_key.as_deref(), Some("xai-test"));
    assert_eq!(settings.providers.grok_model, "grok");
}

#[test]
fn given_zero_interval_when_reading_janitor_period_then_clamps_to_one_second() {
    let mut settings = Settings::default();
    settings.janitor.interval_secs = 0;

    assert_eq!(settings.janitor.interval(), Duration::from_secs(1));
}

#[test]
fn given_legacy_key_variables_when_applied_then_only_unset_keys_are_filled() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("FLUX_API_KEY", "r8_legacy"),
        ("GROK_API_KEY", "legacy-grok"),
        ("GEMINI_API_KEY", ""),
    ]);
    let mut providers = ProviderSettings {
        grok_api_key: Some("configured".to_string()),
        ..ProviderSettings::default()
    };

    providers.apply_legacy_key_vars(|name| vars.get(name).map(|v| v.to_string()));

    assert_eq!(providers.flux_api_key.as_deref(), Some("r8_legacy"));
    assert_eq!(providers.grok_api_key.as_deref(), Some("configured"));
    assert!(providers.gemini_api_key.is_none());
    assert!(providers.nsfw_api_key.is_none());
}
