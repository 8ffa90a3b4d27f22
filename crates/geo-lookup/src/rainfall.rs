//! OpenWeatherMap One Call daily rainfall

use flood_risk::RAINFALL_DAYS;
use serde::Deserialize;

use crate::{get_json, LookupError, Result};

const SERVICE: &str = "weather";

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    daily: Vec<OneCallDay>,
}

#[derive(Debug, Deserialize)]
struct OneCallDay {
    // omitted on dry days
    #[serde(default)]
    rain: Option<f64>,
}

pub struct RainfallApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RainfallApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Up to seven daily rainfall totals (mm), today first
    pub async fn fetch_daily(&self, lat: f64, lng: f64) -> Result<Vec<f64>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingKey("OpenWeatherMap"))?;

        let request = self.client.get(&self.base_url).query(&[
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("exclude", "minutely,hourly,alerts".to_string()),
            ("units", "metric".to_string()),
            ("appid", api_key.to_string()),
        ]);

        let data: OneCallResponse = get_json(request, SERVICE).await?;

        Ok(data
            .daily
            .iter()
            .take(RAINFALL_DAYS)
            .map(|d| d.rain.unwrap_or(0.0))
            .collect())
    }
}
