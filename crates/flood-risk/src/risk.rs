//! Threshold flood-risk classifier

use serde::{Deserialize, Serialize};

use crate::reading::{Elevation, Reading};
use crate::{HEAVY_RAINFALL_MM, LOW_ELEVATION_M};

pub const HIGH_RISK_REASON: &str = "Low elevation + heavy rainfall = flood risk";
pub const LOW_RISK_REASON: &str = "Safe elevation and manageable rainfall.";
pub const MISSING_ELEVATION_REASON: &str = "Elevation unavailable; flood risk cannot be confirmed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub label: RiskLevel,
    pub reason: String,
}

impl RiskAssessment {
    pub fn assess(reading: &Reading) -> Self {
        evaluate(reading.elevation, reading.rainfall_today)
    }

    pub fn is_high(&self) -> bool {
        self.label == RiskLevel::High
    }
}

/// Classify a point from its elevation and today's rainfall.
///
/// Total and pure. NaN rainfall or elevation fails the comparisons and
/// classifies as Low.
pub fn evaluate(elevation: Elevation, rainfall_today_mm: f64) -> RiskAssessment {
    let Some(meters) = elevation.meters() else {
        return RiskAssessment {
            label: RiskLevel::Low,
            reason: MISSING_ELEVATION_REASON.to_string(),
        };
    };

    if meters < LOW_ELEVATION_M && rainfall_today_mm > HEAVY_RAINFALL_MM {
        RiskAssessment {
            label: RiskLevel::High,
            reason: HIGH_RISK_REASON.to_string(),
        }
    } else {
        RiskAssessment {
            label: RiskLevel::Low,
            reason: LOW_RISK_REASON.to_string(),
        }
    }
}
