use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs::atomic_write;
use crate::paths;
use crate::records::UserId;
use crate::session::EvictionPolicy;
use crate::translation::{KNOWN_PROVIDERS, LanguagePair};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:3000";
pub const DEFAULT_DICTIONARY_SERVICE_URL: &str = "http://localhost:3002";

/// The `[bot]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Identity used by the terminal channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// The `[translation]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Source language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Target language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Provider names, highest priority first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<String>>,
    /// Upper bound for a single provider attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Http,
    Memory,
}

/// The `[storage]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
    /// `SQLite` database file for the `sqlite` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_service_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionKind {
    #[default]
    Unbounded,
    Lru,
    Idle,
}

/// The `[sessions]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eviction: Option<EvictionKind>,
    /// Maximum number of sessions for `lru`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    /// Idle time before a session expires for `idle`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_secs: Option<u64>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/vocab/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

impl ConfigFile {
    /// A fully spelled-out file with every default, written by `vocab config --init`.
    pub fn starter() -> Self {
        Self {
            bot: BotConfig {
                user: None,
                log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            },
            translation: TranslationConfig {
                from: Some(LanguagePair::default().source().to_string()),
                to: Some(LanguagePair::default().target().to_string()),
                providers: Some(KNOWN_PROVIDERS.iter().map(ToString::to_string).collect()),
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                backend: Some(StorageBackend::Sqlite),
                path: None,
                user_service_url: Some(DEFAULT_USER_SERVICE_URL.to_string()),
                dictionary_service_url: Some(DEFAULT_DICTIONARY_SERVICE_URL.to_string()),
            },
            sessions: SessionsConfig {
                eviction: Some(EvictionKind::Unbounded),
                capacity: None,
                idle_secs: None,
            },
        }
    }
}

/// Where word and user records live once configuration is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSettings {
    Memory,
    Sqlite {
        path: PathBuf,
    },
    Http {
        user_service_url: String,
        dictionary_service_url: String,
    },
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub user: UserId,
    pub log_level: String,
    pub languages: LanguagePair,
    /// Provider names, highest priority first.
    pub providers: Vec<String>,
    pub timeout: Duration,
    pub storage: StorageSettings,
    pub eviction: EvictionPolicy,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub user: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Replaces the configured provider list when non-empty.
    pub providers: Vec<String>,
    pub storage: Option<StorageBackend>,
    pub log_level: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take precedence
/// over built-in defaults.
///
/// # Errors
///
/// Returns an error for unsupported languages, unknown providers, or invalid
/// session eviction settings.
pub fn resolve_config(options: &ResolveOptions, file: &ConfigFile) -> Result<ResolvedConfig> {
    let user = options
        .user
        .clone()
        .or_else(|| file.bot.user.clone())
        .or_else(|| std::env::var("USER").ok())
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "local".to_string());

    let log_level = options
        .log_level
        .clone()
        .or_else(|| file.bot.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    let defaults = LanguagePair::default();
    let from = options
        .from
        .as_deref()
        .or(file.translation.from.as_deref())
        .unwrap_or(defaults.source());
    let to = options
        .to
        .as_deref()
        .or(file.translation.to.as_deref())
        .unwrap_or(defaults.target());
    let languages = LanguagePair::new(from, to)?;

    let providers: Vec<String> = if options.providers.is_empty() {
        file.translation
            .providers
            .clone()
            .unwrap_or_else(|| KNOWN_PROVIDERS.iter().map(ToString::to_string).collect())
    } else {
        options.providers.clone()
    };
    if providers.is_empty() {
        bail!(
            "No translation providers configured\n\n\
             Set translation.providers in ~/.config/vocab/config.toml, e.g.:\n  \
             providers = [\"google\", \"mymemory\"]"
        );
    }
    if let Some(unknown) = providers
        .iter()
        .find(|p| !KNOWN_PROVIDERS.contains(&p.as_str()))
    {
        bail!(
            "Unknown translation provider: '{unknown}'\n\n\
             Known providers: {}",
            KNOWN_PROVIDERS.join(", ")
        );
    }

    let timeout_secs = file
        .translation
        .timeout_secs
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        bail!("translation.timeout_secs must be greater than zero");
    }

    Ok(ResolvedConfig {
        user: UserId::new(user),
        log_level,
        languages,
        providers,
        timeout: Duration::from_secs(timeout_secs),
        storage: resolve_storage(options.storage, &file.storage)?,
        eviction: resolve_eviction(&file.sessions)?,
    })
}

fn resolve_storage(
    cli_backend: Option<StorageBackend>,
    storage: &StorageConfig,
) -> Result<StorageSettings> {
    let backend = cli_backend.or(storage.backend).unwrap_or_default();

    Ok(match backend {
        StorageBackend::Memory => StorageSettings::Memory,
        StorageBackend::Sqlite => StorageSettings::Sqlite {
            path: match &storage.path {
                Some(path) => path.clone(),
                None => paths::data_dir()?.join("words.db"),
            },
        },
        StorageBackend::Http => StorageSettings::Http {
            user_service_url: storage
                .user_service_url
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_SERVICE_URL.to_string()),
            dictionary_service_url: storage
                .dictionary_service_url
                .clone()
                .unwrap_or_else(|| DEFAULT_DICTIONARY_SERVICE_URL.to_string()),
        },
    })
}

fn resolve_eviction(sessions: &SessionsConfig) -> Result<EvictionPolicy> {
    Ok(match sessions.eviction.unwrap_or_default() {
        EvictionKind::Unbounded => EvictionPolicy::Unbounded,
        EvictionKind::Lru => {
            let capacity = sessions.capacity.and_then(NonZeroUsize::new).ok_or_else(|| {
                anyhow::anyhow!(
                    "sessions.eviction = \"lru\" requires a non-zero sessions.capacity"
                )
            })?;
            EvictionPolicy::LeastRecentlyUsed { capacity }
        }
        EvictionKind::Idle => {
            let idle_secs = sessions.idle_secs.filter(|s| *s > 0).ok_or_else(|| {
                anyhow::anyhow!(
                    "sessions.eviction = \"idle\" requires a non-zero sessions.idle_secs"
                )
            })?;
            EvictionPolicy::IdleFor(Duration::from_secs(idle_secs))
        }
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/vocab/config.toml`
    /// or `~/.config/vocab/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the file, treating a missing file as empty. A file that exists but
    /// does not parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_write(&self.config_path, &contents)
    }
}
