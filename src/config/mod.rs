//! Configuration file handling and resolution against CLI overrides.

mod manager;

pub use manager::{
    BotConfig, ConfigFile, ConfigManager, DEFAULT_DICTIONARY_SERVICE_URL, DEFAULT_LOG_LEVEL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_SERVICE_URL, EvictionKind, ResolveOptions, ResolvedConfig,
    SessionsConfig, StorageBackend, StorageConfig, StorageSettings, TranslationConfig,
    resolve_config,
};
