//! Open Topo Data elevation lookup

use flood_risk::Elevation;
use serde::Deserialize;

use crate::{get_json, Result};

const SERVICE: &str = "elevation";

#[derive(Debug, Deserialize)]
struct OpenTopoResponse {
    #[serde(default)]
    results: Vec<OpenTopoResult>,
}

#[derive(Debug, Deserialize)]
struct OpenTopoResult {
    // null outside dataset coverage
    elevation: Option<f64>,
}

pub struct ElevationApi {
    client: reqwest::Client,
    base_url: String,
}

impl ElevationApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Elevation at a point; `Unavailable` when the dataset has no value there
    pub async fn fetch(&self, lat: f64, lng: f64) -> Result<Elevation> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[("locations", format!("{},{}", lat, lng))]);

        let data: OpenTopoResponse = get_json(request, SERVICE).await?;

        Ok(data
            .results
            .first()
            .and_then(|r| r.elevation)
            .into())
    }
}
