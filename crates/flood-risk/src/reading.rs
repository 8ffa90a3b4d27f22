//! Point readings and locations

use serde::{Deserialize, Serialize};

/// Days of rainfall carried by a reading (today first)
pub const RAINFALL_DAYS: usize = 7;

/// Terrain elevation at a point.
///
/// Serializes as a JSON number, or `null` when the elevation service had no
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Elevation {
    Meters(f64),
    Unavailable,
}

impl Elevation {
    pub fn meters(&self) -> Option<f64> {
        match self {
            Self::Meters(m) => Some(*m),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Meters(_))
    }
}

impl From<Option<f64>> for Elevation {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(m) => Self::Meters(m),
            None => Self::Unavailable,
        }
    }
}

impl From<Elevation> for Option<f64> {
    fn from(value: Elevation) -> Self {
        value.meters()
    }
}

impl std::fmt::Display for Elevation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Meters(m) => write!(f, "{} m", m),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Elevation and rainfall snapshot for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub elevation: Elevation,
    /// Always equal to `rainfall_7day[0]`
    pub rainfall_today: f64,
    #[serde(rename = "rainfall7Day")]
    pub rainfall_7day: [f64; RAINFALL_DAYS],
}

impl Reading {
    /// Build a reading from a daily series, today first.
    ///
    /// Series shorter than seven days are padded with zero, longer ones are
    /// truncated.
    pub fn from_daily(elevation: Elevation, daily: &[f64]) -> Self {
        let mut rainfall_7day = [0.0; RAINFALL_DAYS];
        for (slot, value) in rainfall_7day.iter_mut().zip(daily) {
            *slot = *value;
        }

        Self {
            elevation,
            rainfall_today: rainfall_7day[0],
            rainfall_7day,
        }
    }

    pub fn weekly_total(&self) -> f64 {
        self.rainfall_7day.iter().sum()
    }
}

/// Selected point on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, display_name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            display_name: display_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_daily_pads_short_series() {
        let reading = Reading::from_daily(Elevation::Meters(12.0), &[30.0, 5.0]);
        assert_eq!(reading.rainfall_today, 30.0);
        assert_eq!(reading.rainfall_7day, [30.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_daily_truncates_long_series() {
        let daily: Vec<f64> = (1..=10).map(f64::from).collect();
        let reading = Reading::from_daily(Elevation::Unavailable, &daily);
        assert_eq!(reading.rainfall_7day, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(reading.weekly_total(), 28.0);
    }

    #[test]
    fn test_elevation_serializes_as_number_or_null() {
        let json = serde_json::to_value(Elevation::Meters(42.5)).unwrap();
        assert_eq!(json, serde_json::json!(42.5));

        let json = serde_json::to_value(Elevation::Unavailable).unwrap();
        assert!(json.is_null());

        let back: Elevation = serde_json::from_value(serde_json::json!(null)).unwrap();
        assert_eq!(back, Elevation::Unavailable);
    }

    #[test]
    fn test_reading_uses_camel_case_fields() {
        let reading = Reading::from_daily(Elevation::Meters(80.0), &[10.0; 7]);
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["rainfallToday"], 10.0);
        assert_eq!(json["rainfall7Day"].as_array().unwrap().len(), 7);
        assert!(json.get("rainfall7day").is_none());

        let back: Reading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }
}
