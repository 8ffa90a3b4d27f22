//! Derived dashboard text: short-range forecast, alerts and next-day prediction

use serde::{Deserialize, Serialize};

use crate::reading::Reading;
use crate::risk::RiskAssessment;
use crate::{EXTREME_RAINFALL_MM, HEAVY_RAINFALL_MM, LOW_ELEVATION_M};

pub const FORECAST_WET: &str = "Likely rain next 3 days";
pub const FORECAST_DRY: &str = "Low Risk (3 days)";
pub const LOCAL_FLOOD_ALERT: &str = "⚠ Flood risk in your area.";
pub const PREDICTION_HIGH: &str = "High risk predicted tomorrow!";
pub const PREDICTION_STABLE: &str = "Conditions seem stable tomorrow.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlook {
    pub forecast: String,
    pub alerts: Vec<String>,
    pub prediction: String,
}

impl Outlook {
    pub fn derive(reading: &Reading, assessment: &RiskAssessment) -> Self {
        let forecast = if reading.rainfall_today > HEAVY_RAINFALL_MM {
            FORECAST_WET
        } else {
            FORECAST_DRY
        };

        let alerts = if assessment.is_high() {
            vec![LOCAL_FLOOD_ALERT.to_string()]
        } else {
            Vec::new()
        };

        let extreme = reading
            .elevation
            .meters()
            .map(|m| m < LOW_ELEVATION_M && reading.rainfall_today > EXTREME_RAINFALL_MM)
            .unwrap_or(false);
        let prediction = if extreme { PREDICTION_HIGH } else { PREDICTION_STABLE };

        Self {
            forecast: forecast.to_string(),
            alerts,
            prediction: prediction.to_string(),
        }
    }
}
