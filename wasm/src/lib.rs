//! WebAssembly module for FarmIntel
//!
//! Provides client-side computation for:
//! - Crop suitability scoring
//! - Fertilizer and biodiversity advice texts
//! - Distance and nearby-sample interpolation for offline use

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("FarmIntel WASM module loaded"));
}

fn parse_soil(soil_json: &str) -> Result<SoilReading, JsValue> {
    serde_json::from_str(soil_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid soil JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Score soil for a crop; returns the analysis as JSON
#[wasm_bindgen]
pub fn analyze_soil(soil_json: &str, crop: &str) -> Result<String, JsValue> {
    let soil = parse_soil(soil_json)?;
    to_json(&shared::analyze(&soil, crop))
}

/// Fertilizer plan text for a crop
#[wasm_bindgen]
pub fn fertilizer_plan(soil_json: &str, crop: &str) -> Result<String, JsValue> {
    let soil = parse_soil(soil_json)?;
    let analysis = shared::analyze(&soil, crop);
    Ok(shared::generate_fertilizer_plan(&soil, crop, &analysis))
}

/// Biodiversity and restoration advice text for an area
#[wasm_bindgen]
pub fn biodiversity_advice(
    area_name: &str,
    soil_json: &str,
    crop: &str,
) -> Result<String, JsValue> {
    let soil = parse_soil(soil_json)?;
    let analysis = shared::analyze(&soil, crop);
    Ok(shared::generate_biodiversity_advice(area_name, &soil, crop, &analysis))
}

/// Great-circle distance in kilometres
#[wasm_bindgen]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    shared::distance_km(lat1, lon1, lat2, lon2)
}

/// Weighted soil chemistry from cached samples around a point.
/// Returns `null` JSON when no sample lies within the radius.
#[wasm_bindgen]
pub fn interpolate_soil(
    samples_json: &str,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Result<String, JsValue> {
    let samples: Vec<SampleRecord> = serde_json::from_str(samples_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid samples JSON: {}", e)))?;
    let target = GpsCoordinates::new(latitude, longitude);
    to_json(&shared::aggregate(target, &samples, radius_km).ok())
}

/// Identifiers of the supported crops
#[wasm_bindgen]
pub fn supported_crops() -> js_sys::Array {
    shared::crops()
        .iter()
        .map(|c| JsValue::from_str(c.id))
        .collect()
}

/// Check coordinates before sending them to the server
#[wasm_bindgen]
pub fn validate_farm_coordinates(latitude: f64, longitude: f64) -> bool {
    validate_coordinates(latitude, longitude).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_soil_json() {
        let json = analyze_soil(r#"{"pH": 6.0, "N": 10, "P": 15, "K": 20}"#, "maize").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 0.45);
        assert_eq!(value["suitability"], "Poor");
    }

    #[test]
    fn test_fertilizer_plan_text() {
        let text = fertilizer_plan(r#"{"ph": 6.0, "n": 10, "p": 15, "k": 20}"#, "maize").unwrap();
        assert!(text.contains("CRITICAL POTASSIUM DEFICIENCY"));
    }

    #[test]
    fn test_biodiversity_advice_text() {
        let soil = r#"{"ph": 6.5, "n": 30, "p": 40, "k": 180}"#;
        let text = biodiversity_advice("Siaya", soil, "beans").unwrap();
        assert!(text.contains("Crop rotation"));
    }

    #[test]
    fn test_interpolate_soil() {
        let samples = r#"[
            {"latitude": 0.1241, "longitude": 34.2017, "ph": 6.2, "n": 53, "p": 75, "k": 152},
            {"latitude": 0.1234, "longitude": 34.2011, "ph": 6.3, "n": 39, "p": 58, "k": 112}
        ]"#;
        let near: serde_json::Value =
            serde_json::from_str(&interpolate_soil(samples, 0.124, 34.201, 5.0).unwrap()).unwrap();
        assert!(near["ph"].as_f64().unwrap() > 6.2);

        let far = interpolate_soil(samples, -1.28, 36.82, 5.0).unwrap();
        assert_eq!(far, "null");
    }

    #[test]
    fn test_distance_and_coordinates() {
        assert_eq!(distance_km(0.28, 34.75, 0.28, 34.75), 0.0);
        assert!(validate_farm_coordinates(0.28, 34.75));
        assert!(!validate_farm_coordinates(91.0, 34.75));
    }
}
