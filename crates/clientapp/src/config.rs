//! # Configuration
//!
//! Configuration is managed by [`confique`], which handles layered loading from
//! a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Command line**: applied by the server on top of the loaded value.
//! 2. **Environment variables**: `CLIENTS_FILE`, `HOST`, `PORT`, `LOG_LEVEL`.
//! 3. **Config file**: `clientapi.toml` (or the path given with `--config`).
//! 4. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `clients_file` | `CLIENTS_FILE` | `clients.json` | Backing JSON document |
//! | `host` | `HOST` | `0.0.0.0` | Interface to bind |
//! | `port` | `PORT` | `8000` | TCP port |
//! | `log_level` | `LOG_LEVEL` | `info` | Log specification (`info`, `debug, hyper=warn`, …) |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "clientapi.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path to the JSON document holding every client record.
    /// Created on first write if absent.
    #[config(env = "CLIENTS_FILE", default = "clients.json")]
    pub clients_file: PathBuf,

    /// Interface the HTTP server binds to.
    #[config(env = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[config(env = "PORT", default = 8000)]
    pub port: u16,

    /// Log specification passed to the logger.
    #[config(env = "LOG_LEVEL", default = "info")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clients_file: PathBuf::from("clients.json"),
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the environment, layered over `file` when given.
    pub fn load(file: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder.load()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// A commented TOML template listing every setting and its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compiled_defaults_match_default_impl() {
        let loaded = AppConfig::builder().load().unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_bind_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 9090,
            ..Default::default()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clientapi.toml");
        fs::write(&path, "clients_file = \"/srv/clients.json\"\nport = 8123\n").unwrap();

        let config = AppConfig::builder().file(&path).load().unwrap();

        assert_eq!(config.clients_file, PathBuf::from("/srv/clients.json"));
        assert_eq!(config.port, 8123);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_file_value_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clientapi.toml");
        fs::write(&path, "port = \"eighty\"\n").unwrap();

        assert!(AppConfig::builder().file(&path).load().is_err());
    }

    #[test]
    fn test_template_lists_every_key() {
        let template = AppConfig::template();
        for key in ["clients_file", "host", "port", "log_level"] {
            assert!(template.contains(key), "template is missing {}", key);
        }
    }
}
