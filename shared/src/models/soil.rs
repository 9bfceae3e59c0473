//! Soil chemistry models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::GpsCoordinates;

/// Soil chemistry for a location. N, P and K are in mg/kg.
///
/// All four chemistry fields are non-negative finite numbers: anything
/// missing or malformed is coerced to 0 on construction and deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    #[serde(default, alias = "pH", deserialize_with = "lenient_chemistry")]
    pub ph: f64,
    #[serde(
        rename = "n",
        default,
        alias = "N",
        alias = "nitrogen",
        deserialize_with = "lenient_chemistry"
    )]
    pub nitrogen: f64,
    #[serde(
        rename = "p",
        default,
        alias = "P",
        alias = "phosphorus",
        deserialize_with = "lenient_chemistry"
    )]
    pub phosphorus: f64,
    #[serde(
        rename = "k",
        default,
        alias = "K",
        alias = "potassium",
        deserialize_with = "lenient_chemistry"
    )]
    pub potassium: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl SoilReading {
    pub fn new(ph: f64, nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self::from_raw(Some(ph), Some(nitrogen), Some(phosphorus), Some(potassium))
    }

    /// Build a reading from possibly-missing source values
    pub fn from_raw(
        ph: Option<f64>,
        nitrogen: Option<f64>,
        phosphorus: Option<f64>,
        potassium: Option<f64>,
    ) -> Self {
        Self {
            ph: coerce_chemistry(ph),
            nitrogen: coerce_chemistry(nitrogen),
            phosphorus: coerce_chemistry(phosphorus),
            potassium: coerce_chemistry(potassium),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// A georeferenced soil sample as held by a sample store.
/// Every column is nullable upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ph: Option<f64>,
    #[serde(rename = "n", alias = "nitrogen")]
    pub nitrogen: Option<f64>,
    #[serde(rename = "p", alias = "phosphorus")]
    pub phosphorus: Option<f64>,
    #[serde(rename = "k", alias = "potassium")]
    pub potassium: Option<f64>,
}

impl SampleRecord {
    pub fn new(
        latitude: f64,
        longitude: f64,
        ph: f64,
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
    ) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ph: Some(ph),
            nitrogen: Some(nitrogen),
            phosphorus: Some(phosphorus),
            potassium: Some(potassium),
        }
    }

    /// Sample position, only when both components are present and valid
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        let coords = GpsCoordinates::new(self.latitude?, self.longitude?);
        coords.is_valid().then_some(coords)
    }

    /// Chemistry of this sample with null columns coerced to 0
    pub fn reading(&self) -> SoilReading {
        SoilReading::from_raw(self.ph, self.nitrogen, self.phosphorus, self.potassium)
    }
}

/// Coerce a raw chemistry value: missing, NaN, infinite or negative becomes 0
pub fn coerce_chemistry(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Accepts numbers, numeric strings and null; never fails on malformed values
fn lenient_chemistry<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_chemistry(value.as_ref().and_then(numeric_value)))
}
