//! Config command handler.

use anyhow::{Result, bail};

use crate::config::{ConfigFile, ConfigManager, ResolvedConfig, StorageSettings};
use crate::session::EvictionPolicy;
use crate::ui::Style;

/// Writes the starter config file, refusing to clobber an existing one unless `force`.
pub fn init_config(manager: &ConfigManager, force: bool) -> Result<()> {
    if manager.exists() && !force {
        bail!(
            "Config file already exists: {}\n\n\
             Use 'vocab config --init --force' to overwrite it",
            manager.config_path().display()
        );
    }

    manager.save(&ConfigFile::starter())?;
    println!(
        "{} Wrote {}",
        Style::success("✓"),
        manager.config_path().display()
    );
    Ok(())
}

/// Prints the effective configuration after merging file and CLI values.
pub fn print_config(manager: &ConfigManager, config: &ResolvedConfig) {
    let source = if manager.exists() {
        manager.config_path().display().to_string()
    } else {
        format!("{} (not found, using defaults)", manager.config_path().display())
    };

    println!("{}", Style::header("Configuration"));
    println!("  {}  {}", Style::label("file"), Style::secondary(source));
    println!();
    for (key, value) in describe(config) {
        println!("  {}  {}", Style::label(format!("{key:<12}")), Style::value(value));
    }
}

fn describe(config: &ResolvedConfig) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("user", config.user.to_string()),
        ("languages", config.languages.to_string()),
        ("providers", config.providers.join(" → ")),
        ("timeout", format!("{}s", config.timeout.as_secs())),
        ("log level", config.log_level.clone()),
    ];

    match &config.storage {
        StorageSettings::Memory => rows.push(("storage", "memory".to_string())),
        StorageSettings::Sqlite { path } => {
            rows.push(("storage", "sqlite".to_string()));
            rows.push(("database", path.display().to_string()));
        }
        StorageSettings::Http {
            user_service_url,
            dictionary_service_url,
        } => {
            rows.push(("storage", "http".to_string()));
            rows.push(("users", user_service_url.clone()));
            rows.push(("dictionary", dictionary_service_url.clone()));
        }
    }

    rows.push((
        "sessions",
        match config.eviction {
            EvictionPolicy::Unbounded => "unbounded".to_string(),
            EvictionPolicy::LeastRecentlyUsed { capacity } => format!("lru, {capacity} max"),
            EvictionPolicy::IdleFor(idle) => format!("idle, {}s", idle.as_secs()),
        },
    ));
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{ResolveOptions, StorageBackend, resolve_config};
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_starter_and_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("vocab").join("config.toml"));

        init_config(&manager, false).unwrap();
        assert!(manager.exists());
        assert!(init_config(&manager, false).is_err());
        init_config(&manager, true).unwrap();

        let written = manager.load().unwrap();
        assert_eq!(written.translation.from.as_deref(), Some("en"));
    }

    #[test]
    fn test_describe_memory_config() {
        let options = ResolveOptions {
            user: Some("alice".to_string()),
            storage: Some(StorageBackend::Memory),
            ..ResolveOptions::default()
        };
        let config = resolve_config(&options, &ConfigFile::default()).unwrap();

        let rows = describe(&config);

        assert!(rows.contains(&("user", "alice".to_string())));
        assert!(rows.contains(&("providers", "google → mymemory".to_string())));
        assert!(rows.contains(&("storage", "memory".to_string())));
        assert!(rows.contains(&("sessions", "unbounded".to_string())));
    }
}
