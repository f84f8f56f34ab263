// api-client/src/config.rs
use anyhow::{anyhow, Result};
use api_factory::DEFAULT_CHANNEL_CAPACITY;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Prefix for every request URL, e.g. `http://localhost:3000`
    #[serde(default)]
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
    /// Suppress status notifications unless a call asks for them
    #[serde(default)]
    pub no_event: bool,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            no_event: false,
            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// File contents with environment overrides applied
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(
            std::env::var("API_BASE_URL").ok(),
            std::env::var("API_TOKEN").ok(),
        );
        Ok(config)
    }

    /// File contents only, creating a default file on first use
    pub fn load_file() -> Result<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = config_dir.join("config.toml");

        let config = if config_path.exists() {
            debug!(path = %config_path.display(), "loading config");
            let content = fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            let default = Self::default();
            default.save()?;
            default
        };

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Values from the environment win over the file
    pub fn apply_overrides(&mut self, base_url: Option<String>, token: Option<String>) {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }
        let config_path = config_dir.join("config.toml");

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        // Set permissions to 600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&config_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&config_path, perms)?;
        }

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    fn config_dir() -> Result<PathBuf> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("Cannot determine config directory"))?;
        Ok(base_dirs.config_dir().join("api-cli"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.base_url, "");
        assert_eq!(config.token, None);
        assert!(!config.no_event);
        assert_eq!(config.event_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_parse_file() {
        let config = Config::from_toml(
            r#"
base_url = "http://localhost:3000"
token = "abc"
no_event = true
event_capacity = 8
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert!(config.no_event);
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config {
            base_url: "http://file".to_string(),
            token: Some("file-token".to_string()),
            ..Default::default()
        };

        config.apply_overrides(None, Some(String::new()));
        assert_eq!(config.base_url, "http://file");
        assert_eq!(config.token.as_deref(), Some("file-token"));

        config.apply_overrides(Some("http://env".to_string()), Some("env-token".to_string()));
        assert_eq!(config.base_url, "http://env");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config {
            base_url: "http://localhost:3000".to_string(),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.base_url, config.base_url);
        assert_eq!(back.event_capacity, config.event_capacity);
    }
}
