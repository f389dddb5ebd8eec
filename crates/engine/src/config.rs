//! Client configuration.
//!
//! Stored as YAML. Default location: `<config dir>/track-cropper/config.yaml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, Result};

/// Identity used when neither the host nor the config provides one.
pub const FALLBACK_USER_ID: i64 = 204_668_047;

pub const SERVER_URL_ENV: &str = "TRACK_CROPPER_SERVER_URL";
pub const USER_ID_ENV: &str = "TRACK_CROPPER_USER_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the cropper backend.
    pub server_url: String,
    /// Preferred identity when the host does not provide one.
    pub user_id: Option<i64>,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::from("http://127.0.0.1:8080"),
            user_id: None,
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Host identity first, then the configured one, then the fixed fallback.
    pub fn resolve_user_id(&self, host_user_id: Option<i64>) -> i64 {
        host_user_id
            .or(self.user_id)
            .unwrap_or(FALLBACK_USER_ID)
    }

    /// Applies `TRACK_CROPPER_SERVER_URL` / `TRACK_CROPPER_USER_ID` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(SERVER_URL_ENV).ok(),
            std::env::var(USER_ID_ENV).ok(),
        )
    }

    fn with_overrides(mut self, server_url: Option<String>, user_id: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = url.trim().to_owned();
        }
        if let Some(raw) = user_id {
            match raw.trim().parse::<i64>() {
                Ok(id) => self.user_id = Some(id),
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid user id override"),
            }
        }
        self
    }
}

/// Default config file location, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("track-cropper").join("config.yaml"))
}

/// Loads configuration from a YAML file.
///
/// A missing file yields defaults. An unreadable or invalid file logs a
/// warning and also yields defaults.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use engine::config::load_config;
///
/// let config = load_config(Path::new("config.yaml"));
/// println!("{}", config.server_url);
/// ```
pub fn load_config(path: &Path) -> ClientConfig {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return ClientConfig::default();
    }

    match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "config loaded");
            config
        }
        Err(err) => {
            warn!(error = %err, "using default config");
            ClientConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<ClientConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| EngineError::ConfigFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves configuration as YAML, creating parent directories.
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    let io_error = |source| EngineError::ConfigIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let yaml = serde_yaml::to_string(config).map_err(|source| EngineError::ConfigFormat {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, yaml).map_err(io_error)?;

    info!(path = %path.display(), "config saved");
    Ok(())
}
