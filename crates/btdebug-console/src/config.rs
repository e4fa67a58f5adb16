//! Console configuration, loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "bt-debug";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "bt-debug.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// `host:port` of the simulation's debug endpoint.
    pub addr: String,
    pub reconnect_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:7878".to_string(),
            reconnect_interval_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    /// Lines moved per PageUp/PageDown in the tree panel.
    pub scroll_step: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            scroll_step: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Log file; the TUI owns the terminal so logs never go to stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl UiConfig {
    /// Simulation step for the demo backend: five UI ticks.
    pub fn demo_tick(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10).saturating_mul(5))
    }
}

impl ConsoleConfig {
    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log file to write to, falling back to the platform data directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_DIR).join(LOG_FILE)))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [backend]
            addr = "10.0.0.5:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.addr, "10.0.0.5:9000");
        assert_eq!(config.backend.reconnect_interval_secs, 2);
        assert_eq!(config.ui, UiConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn demo_tick_saturates() {
        assert_eq!(UiConfig::default().demo_tick(), Duration::from_millis(500));
        let huge = UiConfig {
            tick_rate_ms: u64::MAX,
            ..Default::default()
        };
        assert_eq!(huge.demo_tick(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn explicit_log_file_wins() {
        let mut config = ConsoleConfig::default();
        config.logging.file = Some(PathBuf::from("/tmp/bt.log"));
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/bt.log")));
    }
}
