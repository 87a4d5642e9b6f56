use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub janitor: JanitorSettings,
    pub streaming: StreamingSettings,
    pub providers: ProviderSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP_`-prefixed
    /// environment variables, e.g. `APP_STORAGE__MAX_SIZE_MB=50`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let configuration = Config::builder()
            .add_source(
                File::with_name(&environment.settings_file()).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Settings = configuration.try_deserialize()?;
        settings.providers.apply_legacy_key_vars(|name| std::env::var(name).ok());
        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub working_dir: PathBuf,
    pub max_size_mb: u64,
    pub wipe_on_startup: bool,
    pub delete_retry_delay_ms: u64,
}

impl StorageSettings {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }

    pub fn delete_retry_delay(&self) -> Duration {
        Duration::from_millis(self.delete_retry_delay_ms)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("./temp"),
            max_size_mb: 95,
            wipe_on_startup: false,
            delete_retry_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JanitorSettings {
    pub interval_secs: u64,
    pub max_age_secs: u64,
}

impl JanitorSettings {
    /// Never zero; a zero period would make the ticker panic.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

impl Default for JanitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            max_age_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    pub chunk_size_bytes: usize,
    pub cleanup_grace_ms: u64,
}

impl StreamingSettings {
    pub fn cleanup_grace(&self) -> Duration {
        Duration::from_millis(self.cleanup_grace_ms)
    }
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            chunk_size_bytes: 1024 * 1024,
            cleanup_grace_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub yt_dlp_binary: String,
    pub cookies_file: Option<PathBuf>,
    pub download_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub search_cache_capacity: usize,

    pub flux_api_key: Option<String>,
    pub flux_base_url: String,
    pub flux_timeout_secs: u64,
    pub flux_download_timeout_secs: u64,

    pub stability_api_key: Option<String>,
    pub stability_base_url: String,
    pub stability_timeout_secs: u64,

    pub pollinations_base_url: String,
    pub pollinations_timeout_secs: u64,

    pub tts_base_url: String,
    pub tts_default_language: String,
    pub tts_timeout_secs: u64,

    pub grok_api_key: Option<String>,
    pub grok_base_url: String,
    pub grok_model: String,
    pub grok_timeout_secs: u64,

    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,

    pub nsfw_api_key: Option<String>,
    pub nsfw_endpoint: String,
    pub nsfw_timeout_secs: u64,
}

impl ProviderSettings {
    /// Fills keys still unset from the bare variable names older
    /// deployments export (`FLUX_API_KEY` and friends). Empty values count
    /// as unset.
    pub fn apply_legacy_key_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots = [
            (&mut self.flux_api_key, "FLUX_API_KEY"),
            (&mut self.stability_api_key, "STABLE_DIFFUSION_API_KEY"),
            (&mut self.grok_api_key, "GROK_API_KEY"),
            (&mut self.gemini_api_key, "GEMINI_API_KEY"),
            (&mut self.nsfw_api_key, "NSFW_API_KEY"),
        ];
        for (slot, name) in slots {
            if slot.as_deref().is_some_and(|key| !key.is_empty()) {
                continue;
            }
            *slot = lookup(name).filter(|key| !key.is_empty());
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            yt_dlp_binary: "yt-dlp".to_string(),
            cookies_file: Some(PathBuf::from("cookies.txt")),
            download_timeout_secs: 180,
            search_timeout_secs: 30,
            search_cache_capacity: 256,

            flux_api_key: None,
            flux_base_url: "https://api.replicate.com".to_string(),
            flux_timeout_secs: 60,
            flux_download_timeout_secs: 30,

            stability_api_key: None,
            stability_base_url: "https://api.stability.ai".to_string(),
            stability_timeout_secs: 60,

            pollinations_base_url: "https://image.pollinations.ai".to_string(),
            pollinations_timeout_secs: 120,

            tts_base_url: "https://translate.google.com".to_string(),
            tts_default_language: "en".to_string(),
            tts_timeout_secs: 30,

            grok_api_key: None,
            grok_base_url: "https://api.x.ai".to_string(),
            grok_model: "grok".to_string(),
            grok_timeout_secs: 30,

            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-pro".to_string(),
            gemini_timeout_secs: 30,

            nsfw_api_key: None,
            nsfw_endpoint: "https://api.example.com/nsfw/detect".to_string(),
            nsfw_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: crate::infrastructure::observability::DEFAULT_LOG_FILTER.to_string(),
            enable_json: false,
        }
    }
}
