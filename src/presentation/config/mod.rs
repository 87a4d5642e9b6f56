mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    JanitorSettings, LoggingSettings, ProviderSettings, ServerSettings, Settings,
    StorageSettings, StreamingSettings,
};
