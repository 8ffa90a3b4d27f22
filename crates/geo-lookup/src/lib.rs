//! Live Lookup Services for FloodLens
//!
//! Builds a [`flood_risk::Reading`] for a clicked point from three free
//! services, queried concurrently:
//!
//! | Service | Data | Auth |
//! |---------|------|------|
//! | Open Topo Data | Elevation (m) | None |
//! | Nominatim | Reverse geocode | None (User-Agent required) |
//! | OpenWeatherMap One Call | Daily rainfall (mm) | API key |
//!
//! Every lookup failure is recovered inside [`LookupClient`]: elevation
//! degrades to `Unavailable`, the name to `"Unknown location"`, and rainfall
//! to mock values.
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = LookupClient::new(LookupConfig::default())?;
//! let acquisition = client.acquire(25.5941, 85.1376).await;
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod elevation;
pub mod geocode;
pub mod rainfall;

pub use client::LookupClient;
pub use elevation::ElevationApi;
pub use geocode::{GeocodeApi, UNKNOWN_LOCATION};
pub use rainfall::RainfallApi;

pub const DEFAULT_ELEVATION_URL: &str = "https://api.opentopodata.org/v1/test-dataset";
pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// Lookup failures. Never escape [`LookupClient::acquire`].
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    #[error("Request to {service} failed: {message}")]
    RequestFailed { service: &'static str, message: String },
    #[error("{service} returned status: {status}")]
    Api { service: &'static str, status: u16 },
    #[error("Failed to parse {service} response: {message}")]
    Parse { service: &'static str, message: String },
    #[error("No API key configured for {0}")]
    MissingKey(&'static str),
    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, LookupError>;

/// Lookup endpoints and client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub elevation_url: String,
    pub geocode_url: String,
    pub weather_url: String,
    /// OpenWeatherMap key; rainfall falls back to mock values without it
    pub weather_api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_sec: u64,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            elevation_url: DEFAULT_ELEVATION_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather_api_key: None,
            timeout_sec: 10,
            user_agent: concat!("floodlens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Send a GET and decode the JSON body, mapping every failure to a [`LookupError`]
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
    service: &'static str,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| LookupError::RequestFailed {
            service,
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(LookupError::Api {
            service,
            status: response.status().as_u16(),
        });
    }

    response.json().await.map_err(|e| LookupError::Parse {
        service,
        message: e.to_string(),
    })
}
