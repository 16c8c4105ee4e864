// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "FEED_FILTER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/feed_filter.toml";

const ENV_HOST: &str = "IP";
const ENV_PORT: &str = "PORT";
const ENV_FETCH_TIMEOUT: &str = "FEED_FILTER_FETCH_TIMEOUT_SECS";
const ENV_USER_AGENT: &str = "FEED_FILTER_USER_AGENT";
const ENV_LOG_FORMAT: &str = "FEED_FILTER_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format '{other}' (expected compact|json)")),
        }
    }
}

fn default_host() -> String {
    "::".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_user_agent() -> String {
    format!("feed-filter/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upstream fetch timeout. None leaves it to the transport.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            fetch_timeout_secs: None,
            user_agent: default_user_agent(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Resolve configuration:
    /// 1) $FEED_FILTER_CONFIG_PATH (must exist when set)
    /// 2) config/feed_filter.toml if present
    /// 3) built-in defaults
    ///
    /// then apply env overrides (IP, PORT, FEED_FILTER_*).
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    ));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::load_from(&fallback)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(host) = env_nonempty(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = env_nonempty(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT}={port:?} is not a valid port"))?;
        }
        if let Some(secs) = env_nonempty(ENV_FETCH_TIMEOUT) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_FETCH_TIMEOUT}={secs:?} is not a number"))?;
            self.fetch_timeout_secs = Some(secs);
        }
        if let Some(ua) = env_nonempty(ENV_USER_AGENT) {
            self.user_agent = ua;
        }
        if let Some(fmt) = env_nonempty(ENV_LOG_FORMAT) {
            self.log_format = fmt.parse()?;
        }
        Ok(())
    }

    /// Host without IPv6 brackets, ready for `TcpListener::bind((host, port))`.
    pub fn bind_host(&self) -> &str {
        let h = self.host.trim();
        h.strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(h)
    }

    /// `0` (from the file or the environment) means no timeout.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
