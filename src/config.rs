use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Required at process start: base URL of the upstream simulation service.
pub const UPSTREAM_URL_ENV: &str = "SIM_UPSTREAM_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingUpstreamUrl(&'static str),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Upstream dispatch tuning. The base URL deliberately does NOT live here:
/// it is deployment-specific and comes from [`UPSTREAM_URL_ENV`] only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Hard timeout for the single outbound call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

/// Read the upstream base URL once at startup. Absence is a fatal
/// configuration error, never a per-request one.
pub fn upstream_base_url() -> Result<String, ConfigError> {
    match std::env::var(UPSTREAM_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
        _ => Err(ConfigError::MissingUpstreamUrl(UPSTREAM_URL_ENV)),
    }
}
