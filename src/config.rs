use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "config.ini";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub pihole: PiholeConfig,
    pub datadog: DatadogConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PiholeConfig {
    pub host: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Older configs name the secret `api_key`
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatadogConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    /// Comma-separated constant tags appended to every gauge
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_protocol() -> String {
    "auto".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_interval() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PiholeConfig {
    /// The configured secret, preferring `password` over `api_key`.
    ///
    /// Blank values count as absent, which puts the agent in
    /// unauthenticated mode.
    pub fn secret(&self) -> Option<&SecretString> {
        [self.password.as_ref(), self.api_key.as_ref()]
            .into_iter()
            .flatten()
            .find(|s| !s.expose_secret().trim().is_empty())
    }

    /// Client certificate path, if one is configured and non-blank
    pub fn client_cert_path(&self) -> Option<&Path> {
        self.client_cert
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl DatadogConfig {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Config {
    /// Location of `config.ini` beside the running executable
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Failed to locate executable")?;
        let dir = exe
            .parent()
            .context("Executable has no parent directory")?;
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        if !path.is_file() {
            return Err(ExporterError::Config(format!(
                "{} not found",
                path.display()
            ))
            .into());
        }

        let config = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Ini,
            ))
            .add_source(config::Environment::with_prefix("PIHOLE_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .map_err(|e| ExporterError::Config(e.to_string()))
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects blank required keys that deserialized as empty strings
    pub fn validate(&self) -> Result<()> {
        if self.pihole.host.trim().is_empty() {
            return Err(ExporterError::Config("pihole.host must not be empty".to_string()).into());
        }
        if self.datadog.statsd_host.trim().is_empty() {
            return Err(
                ExporterError::Config("datadog.statsd_host must not be empty".to_string()).into(),
            );
        }
        if self.agent.interval_seconds == 0 {
            return Err(
                ExporterError::Config("agent.interval_seconds must be positive".to_string())
                    .into(),
            );
        }
        Ok(())
    }
}
