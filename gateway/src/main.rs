use anyhow::Result;
use flood_risk::{MockReadingGenerator, ReadingSource};
use geo_lookup::LookupClient;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dashboard;
mod error;
mod explain;
mod health;
mod report;
mod routes;

use config::{GatewayConfig, ReadingSourceKind};
use dashboard::DashboardState;
use explain::{ExplanationGateway, HttpChatClient};
use health::HealthMonitor;

#[derive(Clone)]
pub struct AppState {
    pub explainer: Arc<ExplanationGateway>,
    pub source: Arc<dyn ReadingSource>,
    pub dashboard: Arc<DashboardState>,
    pub districts: Arc<Option<serde_json::Value>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "floodlens_gateway=debug,geo_lookup=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;

    let source: Arc<dyn ReadingSource> = match config.reading_source {
        ReadingSourceKind::Live => Arc::new(LookupClient::new(config.lookup.clone())?),
        ReadingSourceKind::Mock => Arc::new(MockReadingGenerator::new()),
    };
    tracing::info!("   Reading source: {}", source.name());

    if config.together_api_key.is_none() {
        tracing::warn!("   TOGETHER_API_KEY not set - explanation requests will fail");
    }
    let explainer = ExplanationGateway::new(
        config.together_api_key.clone(),
        config.chat_model.clone(),
        Arc::new(HttpChatClient::new(config.chat_url.clone())),
    );

    let districts = load_districts(&config.districts_path);

    let dashboard = Arc::new(DashboardState::new());
    HealthMonitor::new(config.status_url.clone(), dashboard.clone())?.spawn();
    tracing::info!("   Polling model status at {}", config.status_url);

    let state = AppState {
        explainer: Arc::new(explainer),
        source,
        dashboard,
        districts: Arc::new(districts),
    };

    let api_routes = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Static file serving for the dashboard UI (if built)
    let app = if config.ui_dir.exists() {
        tracing::info!("   Serving UI from {}", config.ui_dir.display());
        api_routes.fallback_service(ServeDir::new(&config.ui_dir))
    } else {
        tracing::warn!("   UI not built at {}", config.ui_dir.display());
        api_routes
    };

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🌊 FloodLens gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// District overlay, annotated with risk bands; `None` when missing or unreadable
fn load_districts(path: &Path) -> Option<serde_json::Value> {
    if !path.exists() {
        tracing::warn!("   District overlay not found at {}", path.display());
        return None;
    }

    match district_atlas::load_overlay(path) {
        Ok(overlay) => Some(overlay),
        Err(e) => {
            tracing::error!("   Failed to load district overlay: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_overlay_is_none() {
        assert!(load_districts(Path::new("/nonexistent/india_flood.geojson")).is_none());
    }

    #[test]
    fn test_overlay_is_annotated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","properties":{{"district":"Patna","flood_risk":8}},"geometry":null}}]}}"#
        )
        .unwrap();

        let overlay = load_districts(file.path()).unwrap();
        assert_eq!(overlay["features"][0]["properties"]["risk_band"], "high");
    }

    #[test]
    fn test_invalid_overlay_is_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not geojson").unwrap();
        assert!(load_districts(file.path()).is_none());
    }
}
