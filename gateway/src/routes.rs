use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use flood_risk::{Location, Outlook, Reading, RiskAssessment};
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardSnapshot;
use crate::error::{upstream_explanation, ExplanationResponse, GatewayError};
use crate::report::render_report;
use crate::AppState;

pub const STATUS_TEXT: &str = "FloodLens AI using Together API";

#[derive(Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lng: f64,
}

impl PointRequest {
    /// Decode and range-check a `{ lat, lng }` body
    fn from_body(body: &[u8]) -> Result<Self, GatewayError> {
        let point: Self =
            serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        point.validate()?;
        Ok(point)
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if !(self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat)) {
            return Err(GatewayError::InvalidRequest(format!("latitude out of range: {}", self.lat)));
        }
        if !(self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng)) {
            return Err(GatewayError::InvalidRequest(format!("longitude out of range: {}", self.lng)));
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct AssessResponse {
    pub location: Location,
    pub reading: Reading,
    pub assessment: RiskAssessment,
    pub outlook: Outlook,
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/assess", post(assess))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/select", post(select_location))
        .route("/dashboard/explain", post(explain_selection))
        .route("/dashboard/report", get(get_report))
        .route("/districts", get(get_districts));

    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/explain-flood-risk", any(explain_flood_risk))
        .nest("/api/v1", api_routes)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "floodlens-gateway",
        "reading_source": state.source.name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": STATUS_TEXT }))
}

/// Explanation proxy; every method is routed here so non-POST gets the JSON 405
pub async fn explain_flood_risk(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<ExplanationResponse>, GatewayError> {
    let explanation = state.explainer.handle(&method, &body).await?;
    Ok(Json(ExplanationResponse { explanation }))
}

/// Stateless assessment of one point
pub async fn assess(State(state): State<AppState>, body: Bytes) -> Result<Json<AssessResponse>, GatewayError> {
    let req = PointRequest::from_body(&body)?;

    let acquisition = state.source.acquire(req.lat, req.lng).await;
    let assessment = RiskAssessment::assess(&acquisition.reading);
    let outlook = Outlook::derive(&acquisition.reading, &assessment);

    Ok(Json(AssessResponse {
        location: acquisition.location,
        reading: acquisition.reading,
        assessment,
        outlook,
    }))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

/// New map selection: clear, acquire, then apply if still the latest
pub async fn select_location(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DashboardSnapshot>, GatewayError> {
    let req = PointRequest::from_body(&body)?;

    let ticket = state.dashboard.begin_selection(req.lat, req.lng).await;
    let acquisition = state.source.acquire(req.lat, req.lng).await;

    if state.dashboard.complete_selection(ticket, acquisition).await {
        tracing::info!(token = ticket.token(), lat = req.lat, lng = req.lng, "selection applied");
    }

    Ok(Json(state.dashboard.snapshot().await))
}

/// Explain the current selection and keep the text on the dashboard
pub async fn explain_selection(State(state): State<AppState>) -> Result<Json<DashboardSnapshot>, GatewayError> {
    let (ticket, reading) = state.dashboard.begin_explanation().await?;

    // Unavailable elevation is sent as 0 m
    let elevation = reading.elevation.meters().unwrap_or(0.0);
    let explanation = match state
        .explainer
        .request_explanation(elevation, reading.rainfall_today)
        .await
    {
        Ok(text) => text,
        Err(GatewayError::Upstream(message)) => upstream_explanation(&message),
        Err(e) => return Err(e),
    };

    state.dashboard.complete_explanation(ticket, explanation).await;
    Ok(Json(state.dashboard.snapshot().await))
}

pub async fn get_report(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let snapshot = state.dashboard.snapshot().await;
    let report = render_report(&snapshot).ok_or(GatewayError::NothingSelected)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], report))
}

pub async fn get_districts(State(state): State<AppState>) -> Result<Json<serde_json::Value>, GatewayError> {
    match &*state.districts {
        Some(overlay) => Ok(Json(overlay.clone())),
        None => Err(GatewayError::NoOverlay),
    }
}
