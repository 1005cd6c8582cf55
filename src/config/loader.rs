//! Configuration structures and loading logic.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::{ClientOptions, DEFAULT_USER_AGENT};
use crate::api::endpoints::{BASE_URL, SIGNUP_LINK_PREFIX, UPLOAD_BASE_URL};
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

/// Account credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Username, email or phone number used to log in.
    #[serde(default)]
    pub username: Option<String>,

    /// Password. Prefer the `APARAT_PASSWORD` environment variable.
    #[serde(default)]
    pub password: Option<String>,
}

/// Hosts, timeouts and proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Timeout of the binary transfer to the upload host.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_seconds: u64,

    /// Proxy URL per scheme, e.g. `https = "http://127.0.0.1:8080"`.
    #[serde(default)]
    pub proxy: HashMap<String, String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_base_url: default_upload_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            upload_timeout_seconds: default_upload_timeout(),
            proxy: HashMap::new(),
        }
    }
}

/// Where session files live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Video download defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Target directory; the current directory when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_resolution")]
    pub resolution: String,

    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: None,
            resolution: default_resolution(),
            show_progress: true,
        }
    }
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_upload_base_url() -> String {
    UPLOAD_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_upload_timeout() -> u64 {
    600
}

fn default_resolution() -> String {
    "480p".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding `.session` files.
    ///
    /// Falls back to the platform data directory, then the current directory.
    pub fn session_directory(&self) -> PathBuf {
        self.session
            .directory
            .clone()
            .or_else(|| {
                ProjectDirs::from("com", "aparat", "aparat-client")
                    .map(|dirs| dirs.data_dir().join("sessions"))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Client options described by this configuration.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.network.base_url.clone(),
            upload_base_url: self.network.upload_base_url.clone(),
            user_agent: self.network.user_agent.clone(),
            timeout: Duration::from_secs(self.network.timeout_seconds),
            upload_timeout: Duration::from_secs(self.network.upload_timeout_seconds),
            proxy: self.network.proxy.clone(),
            session_dir: self.session_directory(),
            signup_link_prefix: SIGNUP_LINK_PREFIX.to_string(),
        }
    }
}
