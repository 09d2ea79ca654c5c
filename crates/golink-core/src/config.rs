//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/golink/config.toml)
//! 3. Environment variables (GOLINK_* prefix)
//!
//! Environment variables take precedence over config file values. The CLI
//! applies its own flags on top.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable prefix
const ENV_PREFIX: &str = "GOLINK";

/// File name of the links document inside the data directory
pub const LINKS_FILE: &str = "links.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding links.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (GOLINK_DATA_DIR, GOLINK_HOST, GOLINK_PORT, GOLINK_LOG_LEVEL)
    /// 2. Config file (~/.config/golink/config.toml or GOLINK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a config file given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_HOST", ENV_PREFIX)) {
            if !val.is_empty() {
                self.host = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_PORT", ENV_PREFIX)) {
            match val.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid {}_PORT value: {:?}", ENV_PREFIX, val),
            }
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_level = val;
            }
        }
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with GOLINK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("golink")
            .join("config.toml")
    }

    /// Get the path to the links document
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(LINKS_FILE)
    }

    /// Address for the HTTP server to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Links live in the working directory unless configured otherwise
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7410
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "GOLINK_DATA_DIR",
        "GOLINK_HOST",
        "GOLINK_PORT",
        "GOLINK_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 7410);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/srv/golink"),
            ..Config::default()
        };
        assert_eq!(config.links_path(), PathBuf::from("/srv/golink/links.json"));
        assert_eq!(config.listen_addr(), "0.0.0.0:7410");
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("GOLINK_DATA_DIR", "/tmp/golink-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/golink-test"));
    }

    #[test]
    fn test_env_override_port() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("GOLINK_PORT", "8080");
        config.apply_env_overrides();
        assert_eq!(config.port, 8080);

        // Invalid values are ignored
        env::set_var("GOLINK_PORT", "not-a-port");
        config.apply_env_overrides();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_env_override_host_and_log_level() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("GOLINK_HOST", "127.0.0.1");
        env::set_var("GOLINK_LOG_LEVEL", "debug");
        config.apply_env_overrides();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.log_level, "debug");

        // Empty string keeps the current value
        env::set_var("GOLINK_HOST", "");
        config.apply_env_overrides();
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            port = 9000
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.port, 9000);
        // Unset keys fall back to defaults
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_path(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: PathBuf::from("/data/golink"),
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "warn".to_string(),
        };
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "port = \"lots\"").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }
}
