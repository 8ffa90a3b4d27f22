//! District Flood-Impact Atlas
//!
//! Converts district flood-impact tables into the GeoJSON overlay drawn on
//! the FloodLens map, and classifies district flood-risk scores into the
//! legend's three bands.
//!
//! # Legend
//!
//! | Band | Score | Colour |
//! |------|-------|--------|
//! | High | > 7 | `#dc2626` |
//! | Moderate | > 4 | `#facc15` |
//! | Low | otherwise | `#16a34a` |

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub mod overlay;

pub use overlay::{annotate_overlay, load_overlay};

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Overlay is not a FeatureCollection")]
    NotFeatureCollection,
}

pub type Result<T> = std::result::Result<T, AtlasError>;

/// Score above which a district is High risk
pub const HIGH_BAND_MIN: f64 = 7.0;

/// Score above which a district is Moderate risk
pub const MODERATE_BAND_MIN: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_BAND_MIN {
            Self::High
        } else if score > MODERATE_BAND_MIN {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "#dc2626",
            Self::Moderate => "#facc15",
            Self::Low => "#16a34a",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

/// One district row with usable coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub district: Option<String>,
    pub year: Option<String>,
    pub area_affected: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw CSV row; every column optional
#[derive(Debug, Deserialize)]
struct RawDistrictRow {
    #[serde(rename = "District", default)]
    district: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Latitude", default)]
    latitude: Option<String>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<String>,
    #[serde(rename = "FloodedArea", default)]
    flooded_area: Option<String>,
    #[serde(rename = "Impact", default)]
    impact: Option<String>,
}

impl RawDistrictRow {
    fn into_district(self) -> Option<District> {
        let latitude = self.latitude?.trim().parse::<f64>().ok()?;
        let longitude = self.longitude?.trim().parse::<f64>().ok()?;

        Some(District {
            district: self.district,
            year: self.year,
            area_affected: self.flooded_area.or(self.impact),
            latitude,
            longitude,
        })
    }
}

/// Parse district rows, skipping rows without parseable coordinates
pub fn read_districts<R: Read>(reader: R) -> Result<Vec<District>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut districts = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.deserialize::<RawDistrictRow>() {
        match row?.into_district() {
            Some(d) => districts.push(d),
            None => skipped += 1,
        }
    }

    debug!("Parsed {} districts, skipped {}", districts.len(), skipped);
    Ok(districts)
}

pub fn load_districts(path: &Path) -> Result<Vec<District>> {
    let file = File::open(path)?;
    let districts = read_districts(BufReader::new(file))?;
    info!("Loaded {} districts from {:?}", districts.len(), path);
    Ok(districts)
}

/// GeoJSON FeatureCollection of district points
pub fn to_feature_collection(districts: &[District]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = districts
        .iter()
        .map(|d| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [d.longitude, d.latitude]
                },
                "properties": {
                    "district": d.district,
                    "year": d.year,
                    "area_affected": d.area_affected
                }
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features
    })
}
