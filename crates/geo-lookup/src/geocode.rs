//! Nominatim reverse geocoding

use serde::Deserialize;

use crate::{get_json, Result};

const SERVICE: &str = "geocode";

pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
}

pub struct GeocodeApi {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodeApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Human-readable place name for a point
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<String> {
        let request = self.client.get(&self.base_url).query(&[
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("format", "json".to_string()),
        ]);

        let data: NominatimResponse = get_json(request, SERVICE).await?;

        Ok(data
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()))
    }
}
