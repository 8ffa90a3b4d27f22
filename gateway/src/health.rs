//! Periodic model-status poll
//!
//! Polls a status endpoint every 3 seconds and mirrors the answer into the
//! dashboard. A failed poll marks the model offline; the next tick is the
//! only retry.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::dashboard::DashboardState;

pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const MODEL_RUNNING: &str = "Model running";
pub const MODEL_OFFLINE: &str = "Model offline";

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
}

pub struct HealthMonitor {
    client: reqwest::Client,
    status_url: String,
    dashboard: Arc<DashboardState>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(status_url: impl Into<String>, dashboard: Arc<DashboardState>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HEALTH_POLL_INTERVAL)
            .build()?;

        Ok(Self {
            client,
            status_url: status_url.into(),
            dashboard,
            interval: HEALTH_POLL_INTERVAL,
        })
    }

    async fn fetch_status(&self) -> anyhow::Result<String> {
        let response = self.client.get(&self.status_url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("status endpoint returned {}", response.status());
        }

        let body: StatusResponse = response.json().await?;
        Ok(body
            .status
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| MODEL_RUNNING.to_string()))
    }

    /// One poll; returns the status written to the dashboard
    pub async fn poll_once(&self) -> String {
        let status = match self.fetch_status().await {
            Ok(status) => status,
            Err(e) => {
                debug!("Status poll failed: {}", e);
                MODEL_OFFLINE.to_string()
            }
        };

        self.dashboard.set_model_status(status.clone()).await;
        status
    }

    /// Poll forever on a fixed interval
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                self.poll_once().await;
            }
        })
    }
}
