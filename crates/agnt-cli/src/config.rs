//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Agent service used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for agnt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the agent service
    pub base_url: Option<String>,
    /// Request timeout in seconds; unset means wait for the transport
    pub timeout_secs: Option<u64>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// Color theme: "dark" or "light"
    pub theme: Option<String>,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("agnt")
    }

    /// Config file path, honoring AGNT_CONFIG_PATH
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("AGNT_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load the config file, falling back to defaults on any problem
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        Self::init_at(&path)?;
        Ok(path)
    }

    fn init_at(path: &Path) -> std::io::Result<()> {
        if path.exists() {
            return Ok(());
        }
        let default_config = Config {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_secs: None,
            tui: Some(true),
            theme: Some("dark".to_string()),
        };
        default_config.save_to(path)
    }

    /// Base URL by precedence: flag, AGNT_BASE_URL, file, default
    pub fn base_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var("AGNT_BASE_URL").ok();
        resolve_base_url(flag, env.as_deref(), self.base_url.as_deref())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|&s| s > 0)
            .map(Duration::from_secs)
    }
}

fn resolve_base_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# agnt configuration file
# Place at ~/.config/agnt/config.toml (Linux), ~/Library/Application Support/agnt/config.toml (Mac)
# or %APPDATA%\agnt\config.toml (Windows). AGNT_CONFIG_PATH overrides the location.

# Agent service base URL (AGNT_BASE_URL and --base-url take precedence)
base_url = "http://localhost:8000"

# Request timeout in seconds (optional; unset waits for the transport)
# timeout_secs = 120

# Whether to use TUI mode by default
# Set to false for simple stdin/stdout mode
tui = true

# Color theme (dark, light)
theme = "dark"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(config.tui, Some(true));
        assert_eq!(config.theme.as_deref(), Some("dark"));
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str("timeout_secs = 30").unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.base_url.is_none());

        let config: Config = toml::from_str("timeout_secs = 0").unwrap();
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("none.toml")), Config::default());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "tui = \"maybe").unwrap();
        assert_eq!(Config::load_from(&bad), Config::default());
    }

    #[test]
    fn test_init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::init_at(&path).unwrap();
        let written = Config::load_from(&path);
        assert_eq!(written.base_url.as_deref(), Some(DEFAULT_BASE_URL));

        fs::write(&path, "theme = \"light\"").unwrap();
        Config::init_at(&path).unwrap();
        assert_eq!(Config::load_from(&path).theme.as_deref(), Some("light"));
    }

    #[test]
    fn test_base_url_precedence() {
        assert_eq!(resolve_base_url(None, None, None), DEFAULT_BASE_URL);
        assert_eq!(
            resolve_base_url(None, None, Some("http://file:1")),
            "http://file:1"
        );
        assert_eq!(
            resolve_base_url(None, Some("http://env:2"), Some("http://file:1")),
            "http://env:2"
        );
        assert_eq!(
            resolve_base_url(Some("http://flag:3"), Some("http://env:2"), None),
            "http://flag:3"
        );
        assert_eq!(
            resolve_base_url(Some(" "), None, Some("http://file:1")),
            "http://file:1"
        );
    }
}
