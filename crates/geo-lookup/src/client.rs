//! Concurrent lookup fan-out producing a full reading

use async_trait::async_trait;
use flood_risk::{mock_daily_rainfall, Acquisition, Elevation, Location, Reading, ReadingSource};
use tracing::{debug, warn};

use crate::elevation::ElevationApi;
use crate::geocode::{GeocodeApi, UNKNOWN_LOCATION};
use crate::rainfall::RainfallApi;
use crate::{LookupConfig, LookupError, Result};

/// Live [`ReadingSource`] over Open Topo Data, Nominatim and OpenWeatherMap
pub struct LookupClient {
    elevation: ElevationApi,
    geocode: GeocodeApi,
    rainfall: RainfallApi,
}

impl LookupClient {
    pub fn new(config: LookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_sec))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LookupError::Client(e.to_string()))?;

        Ok(Self {
            elevation: ElevationApi::new(client.clone(), config.elevation_url),
            geocode: GeocodeApi::new(client.clone(), config.geocode_url),
            rainfall: RainfallApi::new(client, config.weather_url, config.weather_api_key),
        })
    }

    pub fn has_weather_key(&self) -> bool {
        self.rainfall.has_key()
    }
}

/// Rainfall series to use, substituting mock values for failed or empty lookups
fn resolve_rainfall(result: Result<Vec<f64>>) -> Vec<f64> {
    match result {
        Ok(days) if days.iter().sum::<f64>() > 0.0 => days,
        Ok(_) => {
            debug!("Rainfall lookup returned no rain, using mock series");
            mock_daily_rainfall(&mut rand::thread_rng()).to_vec()
        }
        Err(e) => {
            warn!("Rainfall lookup unavailable, using mock series: {}", e);
            mock_daily_rainfall(&mut rand::thread_rng()).to_vec()
        }
    }
}

#[async_trait]
impl ReadingSource for LookupClient {
    async fn acquire(&self, lat: f64, lng: f64) -> Acquisition {
        let (elevation, name, rainfall) = futures::join!(
            self.elevation.fetch(lat, lng),
            self.geocode.reverse(lat, lng),
            self.rainfall.fetch_daily(lat, lng),
        );

        let elevation = elevation.unwrap_or_else(|e| {
            warn!("Elevation lookup unavailable: {}", e);
            Elevation::Unavailable
        });

        let display_name = name.unwrap_or_else(|e| {
            warn!("Reverse geocode unavailable: {}", e);
            UNKNOWN_LOCATION.to_string()
        });

        let daily = resolve_rainfall(rainfall);

        Acquisition {
            location: Location::new(lat, lng, display_name),
            reading: Reading::from_daily(elevation, &daily),
        }
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, api_key: Option<&str>) -> LookupConfig {
        LookupConfig {
            elevation_url: format!("{}/elevation", server.uri()),
            geocode_url: format!("{}/reverse", server.uri()),
            weather_url: format!("{}/onecall", server.uri()),
            weather_api_key: api_key.map(str::to_string),
            timeout_sec: 5,
            ..LookupConfig::default()
        }
    }

    async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_acquire_combines_all_lookups() {
        let server = MockServer::start().await;
        mount_json(&server, "/elevation", serde_json::json!({ "results": [{ "elevation": 42.0 }] })).await;
        mount_json(&server, "/reverse", serde_json::json!({ "display_name": "Guwahati, Assam" })).await;
        mount_json(
            &server,
            "/onecall",
            serde_json::json!({ "daily": [{ "rain": 64.0 }, { "rain": 12.0 }] }),
        )
        .await;

        let client = LookupClient::new(config_for(&server, Some("k"))).unwrap();
        let acquisition = client.acquire(26.14, 91.73).await;

        assert_eq!(acquisition.location.display_name, "Guwahati, Assam");
        assert_eq!(acquisition.reading.elevation, Elevation::Meters(42.0));
        assert_eq!(acquisition.reading.rainfall_today, 64.0);
        assert_eq!(acquisition.reading.rainfall_7day[1], 12.0);
        assert_eq!(acquisition.reading.rainfall_7day[6], 0.0);
    }

    #[tokio::test]
    async fn test_failures_degrade_to_sentinels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = LookupClient::new(config_for(&server, Some("k"))).unwrap();
        let acquisition = client.acquire(10.0, 20.0).await;

        assert_eq!(acquisition.location.display_name, UNKNOWN_LOCATION);
        assert_eq!(acquisition.reading.elevation, Elevation::Unavailable);
        // mock fallback series
        assert!(acquisition.reading.rainfall_7day.iter().all(|d| (0.0..60.0).contains(d)));
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let server = MockServer::start().await;
        let delay = std::time::Duration::from_millis(300);
        for (route, body) in [
            ("/elevation", serde_json::json!({ "results": [{ "elevation": 5.0 }] })),
            ("/reverse", serde_json::json!({ "display_name": "Dhaka" })),
            ("/onecall", serde_json::json!({ "daily": [{ "rain": 20.0 }] })),
        ] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
                .mount(&server)
                .await;
        }

        let client = LookupClient::new(config_for(&server, Some("k"))).unwrap();
        let started = std::time::Instant::now();
        let acquisition = client.acquire(23.8, 90.4).await;
        let elapsed = started.elapsed();

        assert_eq!(acquisition.location.display_name, "Dhaka");
        assert_eq!(acquisition.reading.rainfall_today, 20.0);
        // sequential lookups would take at least 900ms
        assert!(elapsed < std::time::Duration::from_millis(750), "took {:?}", elapsed);
    }

    #[test]
    fn test_dry_week_uses_mock_series() {
        let days = resolve_rainfall(Ok(vec![0.0; 7]));
        assert_eq!(days.len(), 7);
        assert!(days.iter().all(|d| (0.0..60.0).contains(d)));

        let days = resolve_rainfall(Ok(Vec::new()));
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn test_wet_week_is_kept() {
        let days = resolve_rainfall(Ok(vec![0.0, 4.0]));
        assert_eq!(days, vec![0.0, 4.0]);
    }
}
