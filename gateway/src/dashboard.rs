//! Dashboard state
//!
//! One owned state object holding the active selection. Transitions:
//!
//! ```text
//! begin_selection ─▶ complete_selection ─▶ begin_explanation ─▶ complete_explanation
//! (token+1, clear)   (reading, assessment)   (needs a reading)    (explanation text)
//! ```
//!
//! Every selection bumps a monotonically increasing token. Results carrying an
//! older token are dropped, so a slow lookup for a superseded point can never
//! overwrite the newer selection.

use chrono::{DateTime, Utc};
use flood_risk::{Acquisition, Location, Outlook, Reading, RiskAssessment};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::GatewayError;

pub const LOADING_LOCATION_NAME: &str = "Loading…";
pub const INITIAL_MODEL_STATUS: &str = "Model loading...";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub token: u64,
    pub location: Option<Location>,
    pub reading: Option<Reading>,
    pub assessment: Option<RiskAssessment>,
    pub outlook: Option<Outlook>,
    pub explanation: Option<String>,
    pub model_status: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            token: 0,
            location: None,
            reading: None,
            assessment: None,
            outlook: None,
            explanation: None,
            model_status: INITIAL_MODEL_STATUS.to_string(),
            updated_at: Utc::now(),
        }
    }
}

/// Proof that a caller started the selection with this token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    token: u64,
}

impl SelectionTicket {
    pub fn token(&self) -> u64 {
        self.token
    }
}

#[derive(Default)]
pub struct DashboardState {
    inner: RwLock<DashboardSnapshot>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.inner.read().await.clone()
    }

    /// Start a new selection, superseding any in-flight one
    pub async fn begin_selection(&self, lat: f64, lng: f64) -> SelectionTicket {
        let mut state = self.inner.write().await;
        state.token += 1;
        state.location = Some(Location::new(lat, lng, LOADING_LOCATION_NAME));
        state.reading = None;
        state.assessment = None;
        state.outlook = None;
        state.explanation = None;
        state.updated_at = Utc::now();

        SelectionTicket { token: state.token }
    }

    /// Apply acquired data. Returns `false` when the ticket is stale.
    pub async fn complete_selection(&self, ticket: SelectionTicket, acquisition: Acquisition) -> bool {
        let mut state = self.inner.write().await;
        if state.token != ticket.token {
            debug!(
                stale = ticket.token,
                current = state.token,
                "discarding superseded selection"
            );
            return false;
        }

        let assessment = RiskAssessment::assess(&acquisition.reading);
        state.outlook = Some(Outlook::derive(&acquisition.reading, &assessment));
        state.assessment = Some(assessment);
        state.location = Some(acquisition.location);
        state.reading = Some(acquisition.reading);
        state.updated_at = Utc::now();
        true
    }

    /// Reading to explain, tied to the current selection
    pub async fn begin_explanation(&self) -> Result<(SelectionTicket, Reading), GatewayError> {
        let state = self.inner.read().await;
        let reading = state.reading.clone().ok_or(GatewayError::NothingSelected)?;
        Ok((SelectionTicket { token: state.token }, reading))
    }

    /// Store explanation text. Returns `false` when the ticket is stale.
    pub async fn complete_explanation(&self, ticket: SelectionTicket, explanation: String) -> bool {
        let mut state = self.inner.write().await;
        if state.token != ticket.token {
            debug!(stale = ticket.token, current = state.token, "discarding superseded explanation");
            return false;
        }

        state.explanation = Some(explanation);
        state.updated_at = Utc::now();
        true
    }

    pub async fn set_model_status(&self, status: impl Into<String>) {
        let mut state = self.inner.write().await;
        state.model_status = status.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_risk::{Elevation, RiskLevel};

    fn acquisition(lat: f64, lng: f64, elevation: f64, rain: f64) -> Acquisition {
        Acquisition {
            location: Location::new(lat, lng, "Test"),
            reading: Reading::from_daily(Elevation::Meters(elevation), &[rain]),
        }
    }

    #[tokio::test]
    async fn test_selection_lifecycle() {
        let dashboard = DashboardState::new();

        let ticket = dashboard.begin_selection(25.0, 85.0).await;
        let loading = dashboard.snapshot().await;
        assert_eq!(loading.location.unwrap().display_name, LOADING_LOCATION_NAME);
        assert!(loading.reading.is_none());

        assert!(dashboard.complete_selection(ticket, acquisition(25.0, 85.0, 20.0, 70.0)).await);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.assessment.unwrap().label, RiskLevel::High);
        assert_eq!(snapshot.outlook.unwrap().alerts.len(), 1);
        assert_eq!(snapshot.location.unwrap().display_name, "Test");
    }

    #[tokio::test]
    async fn test_stale_selection_is_discarded() {
        let dashboard = DashboardState::new();

        let first = dashboard.begin_selection(10.0, 10.0).await;
        let second = dashboard.begin_selection(20.0, 20.0).await;
        assert!(second.token() > first.token());

        assert!(dashboard.complete_selection(second, acquisition(20.0, 20.0, 100.0, 5.0)).await);
        // the slow first lookup arrives late
        assert!(!dashboard.complete_selection(first, acquisition(10.0, 10.0, 5.0, 90.0)).await);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.location.unwrap().lat, 20.0);
        assert_eq!(snapshot.assessment.unwrap().label, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_new_selection_clears_explanation() {
        let dashboard = DashboardState::new();
        let ticket = dashboard.begin_selection(1.0, 1.0).await;
        dashboard.complete_selection(ticket, acquisition(1.0, 1.0, 10.0, 10.0)).await;

        let (ticket, _) = dashboard.begin_explanation().await.unwrap();
        assert!(dashboard.complete_explanation(ticket, "Low risk.".into()).await);
        assert_eq!(dashboard.snapshot().await.explanation.as_deref(), Some("Low risk."));

        dashboard.begin_selection(2.0, 2.0).await;
        assert!(dashboard.snapshot().await.explanation.is_none());
    }

    #[tokio::test]
    async fn test_explanation_for_superseded_selection_is_dropped() {
        let dashboard = DashboardState::new();
        let ticket = dashboard.begin_selection(1.0, 1.0).await;
        dashboard.complete_selection(ticket, acquisition(1.0, 1.0, 10.0, 10.0)).await;

        let (explain_ticket, _) = dashboard.begin_explanation().await.unwrap();
        dashboard.begin_selection(2.0, 2.0).await;

        assert!(!dashboard.complete_explanation(explain_ticket, "old".into()).await);
        assert!(dashboard.snapshot().await.explanation.is_none());
    }

    #[tokio::test]
    async fn test_explanation_requires_reading() {
        let dashboard = DashboardState::new();
        assert!(matches!(
            dashboard.begin_explanation().await,
            Err(GatewayError::NothingSelected)
        ));
    }

    #[tokio::test]
    async fn test_model_status_survives_selection() {
        let dashboard = DashboardState::new();
        assert_eq!(dashboard.snapshot().await.model_status, INITIAL_MODEL_STATUS);

        dashboard.set_model_status("Model offline").await;
        dashboard.begin_selection(1.0, 1.0).await;
        assert_eq!(dashboard.snapshot().await.model_status, "Model offline");
    }
}
