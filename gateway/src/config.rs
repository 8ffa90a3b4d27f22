//! Gateway configuration, read once from the environment at startup

use geo_lookup::LookupConfig;
use std::path::PathBuf;
use thiserror::Error;

use crate::explain::{DEFAULT_CHAT_MODEL, DEFAULT_CHAT_URL};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Where readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSourceKind {
    Live,
    Mock,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    /// Chat-completion credential; explanations are refused without it
    pub together_api_key: Option<String>,
    pub chat_url: String,
    pub chat_model: String,
    pub reading_source: ReadingSourceKind,
    pub lookup: LookupConfig,
    pub status_url: String,
    pub districts_path: PathBuf,
    pub ui_dir: PathBuf,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port_var = ["FLOODLENS_PORT", "PORT"]
            .into_iter()
            .find_map(|var| get(var).map(|raw| (var, raw)));
        let port = match port_var {
            Some((var, raw)) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var, value: raw })?,
            None => DEFAULT_PORT,
        };

        let weather_api_key = get("OPENWEATHER_API_KEY");

        let reading_source = match get("FLOODLENS_READING_SOURCE").as_deref() {
            Some("live") => ReadingSourceKind::Live,
            Some("mock") => ReadingSourceKind::Mock,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "FLOODLENS_READING_SOURCE",
                    value: other.to_string(),
                })
            }
            None if weather_api_key.is_some() => ReadingSourceKind::Live,
            None => ReadingSourceKind::Mock,
        };

        let defaults = LookupConfig::default();
        let timeout_sec = match get("FLOODLENS_LOOKUP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "FLOODLENS_LOOKUP_TIMEOUT_SECS",
                value: raw,
            })?,
            None => defaults.timeout_sec,
        };

        let lookup_config = LookupConfig {
            elevation_url: get("FLOODLENS_ELEVATION_URL").unwrap_or(defaults.elevation_url),
            geocode_url: get("FLOODLENS_GEOCODE_URL").unwrap_or(defaults.geocode_url),
            weather_url: get("FLOODLENS_WEATHER_URL").unwrap_or(defaults.weather_url),
            weather_api_key,
            timeout_sec,
            user_agent: defaults.user_agent,
        };

        Ok(Self {
            port,
            together_api_key: get("TOGETHER_API_KEY"),
            chat_url: get("FLOODLENS_CHAT_URL").unwrap_or_else(|| DEFAULT_CHAT_URL.to_string()),
            chat_model: get("FLOODLENS_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            reading_source,
            lookup: lookup_config,
            status_url: get("FLOODLENS_STATUS_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{}/status", port)),
            districts_path: get("FLOODLENS_DISTRICTS_PATH")
                .unwrap_or_else(|| "data/india_flood.geojson".to_string())
                .into(),
            ui_dir: get("FLOODLENS_UI_DIR").unwrap_or_else(|| "ui/dist".to_string()).into(),
        })
    }
}
