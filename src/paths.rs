//! XDG-style path utilities for configuration and data.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations
//! so the layout is the same on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "vocab";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/vocab` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/vocab` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

/// Returns the data directory holding the local word database.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/vocab` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/vocab` otherwise
pub fn data_dir() -> Result<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

fn xdg_dir(env_var: &str, fallback: &[&str]) -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var(env_var)
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let mut dir = dirs::home_dir().context("Failed to determine home directory")?;
    dir.extend(fallback);
    Ok(dir.join(APP_DIR))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<F: FnOnce()>(key: &str, value: Option<&str>, f: F) {
        let original = std::env::var(key).ok();
        // SAFETY: tests touching the environment are serialized
        unsafe {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }

        f();

        // SAFETY: see above
        unsafe {
            match original {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        with_env("XDG_CONFIG_HOME", None, || {
            assert!(config_dir().unwrap().ends_with(".config/vocab"));
        });
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        with_env("XDG_CONFIG_HOME", Some("/custom/config"), || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/vocab"));
        });
    }

    #[test]
    #[serial]
    fn test_data_dir_default() {
        with_env("XDG_DATA_HOME", None, || {
            assert!(data_dir().unwrap().ends_with(".local/share/vocab"));
        });
    }

    #[test]
    #[serial]
    fn test_data_dir_xdg_override() {
        with_env("XDG_DATA_HOME", Some("/custom/data"), || {
            assert_eq!(data_dir().unwrap(), PathBuf::from("/custom/data/vocab"));
        });
    }
}
