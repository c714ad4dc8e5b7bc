//! Configuration file management for pg-flame.
//!
//! Provides a TOML-based config file at `~/.config/pg-flame/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pgflame_core::PageOptions;

/// Environment variable overriding the configured page title.
pub const TITLE_ENV: &str = "PG_FLAME_TITLE";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub page: PageSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageSection {
    /// Title of generated pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the pg-flame config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/pg-flame` or
/// `~/.config/pg-flame`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("pg-flame");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pg-flame")
}

/// Return the path to the pg-flame config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file at `path`. A missing file is `Ok(None)`; a file that
/// exists but does not parse is an error.
pub fn load_config_from(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Load the config file from its default location.
pub fn load_config() -> Result<Option<ConfigFile>> {
    load_config_from(&config_path())
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct FlameConfig {
    pub page: PageOptions,
}

impl FlameConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Title: `cli_title` > `PG_FLAME_TITLE` env > `config_file.page.title` > `PageOptions::DEFAULT_TITLE`
    pub fn resolve(cli_title: Option<&str>) -> Result<Self> {
        let file_config = load_config()?;

        let title = if let Some(title) = cli_title {
            title.to_owned()
        } else if let Ok(title) = std::env::var(TITLE_ENV) {
            title
        } else if let Some(title) = file_config.and_then(|cfg| cfg.page.title) {
            title
        } else {
            PageOptions::DEFAULT_TITLE.to_owned()
        };

        tracing::debug!(%title, "resolved page title");

        Ok(Self {
            page: PageOptions::new(title),
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Run `f` with the config directory pointed at a fresh temp dir.
    fn with_temp_config_home<T>(f: impl FnOnce(&Path) -> T) -> T {
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let result = f(tmp.path());

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        result
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let _lock = lock_env();
        let path = config_path();
        assert!(
            path.ends_with("pg-flame/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }

    #[test]
    fn missing_config_file_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let loaded = load_config_from(&tmp.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[page\ntitle = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(
            format!("{err:#}").contains("failed to parse config file"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        let loaded = load_config_from(&path).unwrap().unwrap();
        assert!(loaded.page.title.is_none());
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        with_temp_config_home(|home| {
            let original = ConfigFile {
                page: PageSection {
                    title: Some("Nightly reports".to_owned()),
                },
            };
            let path = save_config(&original).unwrap();
            assert_eq!(path, home.join("pg-flame").join("config.toml"));

            let loaded = load_config().unwrap().unwrap();
            assert_eq!(loaded.page.title.as_deref(), Some("Nightly reports"));
        });
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        with_temp_config_home(|_| {
            save_config(&ConfigFile {
                page: PageSection {
                    title: Some("from file".to_owned()),
                },
            })
            .unwrap();
            unsafe { std::env::set_var(TITLE_ENV, "from env") };

            let config = FlameConfig::resolve(Some("from flag")).unwrap();
            assert_eq!(config.page.title, "from flag");

            unsafe { std::env::remove_var(TITLE_ENV) };
        });
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        with_temp_config_home(|_| {
            save_config(&ConfigFile {
                page: PageSection {
                    title: Some("from file".to_owned()),
                },
            })
            .unwrap();
            unsafe { std::env::set_var(TITLE_ENV, "from env") };

            let config = FlameConfig::resolve(None).unwrap();
            assert_eq!(config.page.title, "from env");

            unsafe { std::env::remove_var(TITLE_ENV) };
        });
    }

    #[test]
    fn resolve_uses_config_file() {
        let _lock = lock_env();
        with_temp_config_home(|_| {
            unsafe { std::env::remove_var(TITLE_ENV) };
            save_config(&ConfigFile {
                page: PageSection {
                    title: Some("from file".to_owned()),
                },
            })
            .unwrap();

            let config = FlameConfig::resolve(None).unwrap();
            assert_eq!(config.page.title, "from file");
        });
    }

    #[test]
    fn resolve_defaults_title_when_nothing_set() {
        let _lock = lock_env();
        with_temp_config_home(|_| {
            unsafe { std::env::remove_var(TITLE_ENV) };
            let config = FlameConfig::resolve(None).unwrap();
            assert_eq!(config.page.title, PageOptions::DEFAULT_TITLE);
        });
    }
}
