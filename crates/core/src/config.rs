use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::CoreError;

/// Client settings, read from `config.toml`.
///
/// ```toml
/// base_url = "https://wallet.example.com"
/// timeout_secs = 30
/// redirect_delay_ms = 250
/// session_file = "/home/me/.local/share/wallet/session.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the REST API; paths like `/api/accounts` are appended.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Pause before returning to a list after a create/edit/remove.
    pub redirect_delay_ms: u64,

    /// Where the session is persisted. Defaults to [`ClientConfig::default_session_file`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            redirect_delay_ms: 250,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// `<config_dir>/wallet/config.toml`, or `./wallet/config.toml` when the
    /// platform has no config dir.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("wallet").join("config.toml")
    }

    /// `<data_dir>/wallet/session.json`.
    pub fn default_session_file() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("wallet").join("session.json")
    }

    /// Load from the default location; a missing file means defaults.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            CoreError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(CoreError::Config("base_url must not be empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "base_url must start with http:// or https://, got {base}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(Self::default_session_file)
    }
}
