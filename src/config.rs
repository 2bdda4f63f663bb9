use crate::error::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lidarr: LidarrConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LidarrConfig {
    pub address: String,
    pub api_key: String,
    pub api_timeout_secs: u64,
}

impl Default for LidarrConfig {
    fn default() -> Self {
        Self {
            address: "http://192.168.1.2:8686".to_string(),
            api_key: String::new(),
            api_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub fetch_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.songkick.com".to_string(),
            fetch_delay_ms: 2000,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file, falling back to defaults when the
    /// file is absent. Environment variables take precedence over file values.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let config_content = fs::read_to_string(path)?;
            toml::from_str(&config_content)?
        } else {
            Config {
                lidarr: LidarrConfig::default(),
                source: SourceConfig::default(),
            }
        };

        if let Ok(address) = env::var("LIDARR_ADDRESS") {
            config.lidarr.address = address;
        }
        if let Ok(api_key) = env::var("LIDARR_API_KEY") {
            config.lidarr.api_key = api_key;
        }
        if let Ok(timeout) = env::var("LIDARR_API_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                config.lidarr.api_timeout_secs = secs;
            }
        }
        if let Ok(delay) = env::var("SOURCE_FETCH_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                config.source.fetch_delay_ms = ms;
            }
        }

        Ok(config)
    }
}
