//! Configuration management.

use anyhow::{bail, Context};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use mcp_relay_types::PROTOCOL_VERSION;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Remote endpoint used when nothing else is configured.
pub const DEFAULT_REMOTE_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration structure that matches the TOML file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    remote: RemoteConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RemoteConfig {
    #[serde(default = "default_url")]
    url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    connect_timeout_secs: u64,
    #[serde(default = "default_protocol_version")]
    protocol_version: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            protocol_version: default_protocol_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoggingConfig {
    /// Path to log file (if set, logs are written there in addition to stderr)
    log_file: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    log_level: Option<String>,
}

fn default_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_protocol_version() -> String {
    PROTOCOL_VERSION.to_string()
}

/// Values given on the command line. `None` leaves the lower layers in charge.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub protocol_version: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Relay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the remote MCP server; the endpoint is `<url>/mcp/`
    pub url: String,
    /// Upper bound for one complete HTTP exchange
    pub timeout: Duration,
    /// Upper bound for establishing the TCP/TLS connection
    pub connect_timeout: Duration,
    /// Value of the `MCP-Protocol-Version` request header
    pub protocol_version: String,
    /// Path to log file (if set, logs are written there in addition to stderr)
    pub log_file: Option<PathBuf>,
    /// Log level (if set, overrides RUST_LOG environment variable)
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with full priority chain: CLI args > env vars > config files > defaults.
    ///
    /// Config files are searched in this order:
    /// 1. `.mcp-relay.toml` in current directory
    /// 2. `config.toml` in user config directory (~/.config/mcp-relay/ on Linux)
    ///
    /// Environment variables use the `MCP_RELAY_` prefix with `__` between
    /// section and key, e.g. `MCP_RELAY_REMOTE__TIMEOUT_SECS=30`.
    pub fn from_figment(overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let user_config = directories::ProjectDirs::from("", "", "mcp-relay")
            .map(|dirs| dirs.config_dir().join("config.toml"));
        Self::load(user_config, overrides)
    }

    /// Layer the sources with an explicit user config path.
    fn load(user_config: Option<PathBuf>, overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let local_config = std::env::current_dir()
            .ok()
            .map(|d| d.join(".mcp-relay.toml"));

        // Priority: defaults < user config < local config < env vars < CLI args
        let mut figment = Figment::new().merge(Serialized::defaults(ConfigFile::default()));

        if let Some(ref path) = user_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(ref path) = local_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("MCP_RELAY_").split("__"));

        if let Some(ref url) = overrides.url {
            figment = figment.merge(Serialized::default("remote.url", url));
        }
        if let Some(secs) = overrides.timeout_secs {
            figment = figment.merge(Serialized::default("remote.timeout_secs", secs));
        }
        if let Some(ref version) = overrides.protocol_version {
            figment = figment.merge(Serialized::default("remote.protocol_version", version));
        }
        if let Some(ref level) = overrides.log_level {
            figment = figment.merge(Serialized::default("logging.log_level", level));
        }
        if let Some(ref file) = overrides.log_file {
            figment = figment.merge(Serialized::default("logging.log_file", file));
        }

        let config_file: ConfigFile = figment
            .extract()
            .context("Failed to load relay configuration")?;

        let config = Self {
            url: config_file.remote.url,
            timeout: Duration::from_secs(config_file.remote.timeout_secs),
            connect_timeout: Duration::from_secs(config_file.remote.connect_timeout_secs),
            protocol_version: config_file.remote.protocol_version,
            log_file: config_file.logging.log_file,
            log_level: config_file.logging.log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for the given base URL with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            protocol_version: PROTOCOL_VERSION.to_string(),
            log_file: None,
            log_level: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the URL is usable and the timeouts are non-zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.url).with_context(|| format!("Invalid URL: {}", self.url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("Unsupported URL scheme '{}' in {}", url.scheme(), self.url);
        }
        if self.timeout.is_zero() {
            bail!("remote.timeout_secs must be greater than zero");
        }
        if self.connect_timeout.is_zero() {
            bail!("remote.connect_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
