mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LoggingSettings, MediaSettings, PipelineSettings, ServerSettings, Settings,
    StorageProviderSetting, StorageSettings, TranscriptionSettings,
};
