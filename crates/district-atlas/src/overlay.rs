//! Prepared GeoJSON overlays served to the map

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{AtlasError, Result, RiskBand};

/// Read a GeoJSON FeatureCollection from disk and annotate its risk bands
pub fn load_overlay(path: &Path) -> Result<serde_json::Value> {
    let file = File::open(path)?;
    let mut overlay: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    let banded = annotate_overlay(&mut overlay)?;
    tracing::info!("Loaded district overlay {:?} ({} banded features)", path, banded);
    Ok(overlay)
}

fn score_of(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Add `risk_band` and `color` to every feature carrying a `flood_risk` score.
///
/// Returns the number of features annotated.
pub fn annotate_overlay(overlay: &mut serde_json::Value) -> Result<usize> {
    if overlay.get("type").and_then(|t| t.as_str()) != Some("FeatureCollection") {
        return Err(AtlasError::NotFeatureCollection);
    }

    let Some(features) = overlay.get_mut("features").and_then(|f| f.as_array_mut()) else {
        return Err(AtlasError::NotFeatureCollection);
    };

    let mut annotated = 0;
    for feature in features.iter_mut() {
        let Some(properties) = feature.get_mut("properties").and_then(|p| p.as_object_mut()) else {
            continue;
        };
        let Some(score) = properties.get("flood_risk").and_then(score_of) else {
            continue;
        };

        let band = RiskBand::from_score(score);
        properties.insert("risk_band".to_string(), band.as_str().into());
        properties.insert("color".to_string(), band.color().into());
        annotated += 1;
    }

    Ok(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn overlay() -> serde_json::Value {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "district": "A", "flood_risk": 8.5 } },
                { "type": "Feature", "properties": { "district": "B", "flood_risk": "5" } },
                { "type": "Feature", "properties": { "district": "C" } }
            ]
        })
    }

    #[test]
    fn test_annotate_bands() {
        let mut value = overlay();
        assert_eq!(annotate_overlay(&mut value).unwrap(), 2);

        let features = value["features"].as_array().unwrap();
        assert_eq!(features[0]["properties"]["risk_band"], "high");
        assert_eq!(features[0]["properties"]["color"], "#dc2626");
        assert_eq!(features[1]["properties"]["risk_band"], "moderate");
        assert!(features[2]["properties"].get("risk_band").is_none());
    }

    #[test]
    fn test_rejects_non_collections() {
        let mut value = serde_json::json!({ "type": "Feature" });
        assert!(matches!(
            annotate_overlay(&mut value),
            Err(AtlasError::NotFeatureCollection)
        ));
    }

    #[test]
    fn test_load_overlay_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", overlay()).unwrap();

        let value = load_overlay(file.path()).unwrap();
        assert_eq!(value["features"][1]["properties"]["color"], "#facc15");
    }
}
