//! OpenEPI soil type client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::GpsCoordinates;

use super::{get_json, http_client, SoilTypeProvider};
use crate::error::AppResult;

const SERVICE: &str = "Soil API";

/// Number of ranked soil classes requested per lookup
const TOP_K: u8 = 3;

#[derive(Clone)]
pub struct OpenEpiSoilClient {
    client: Client,
    base_url: String,
}

/// World Reference Base soil group for a point
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SoilType {
    pub most_probable: String,
    pub probabilities: Vec<SoilTypeProbability>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SoilTypeProbability {
    pub soil_type: String,
    pub probability: f64,
}

#[derive(Debug, Deserialize)]
struct SoilTypeFeature {
    properties: SoilTypeProperties,
}

#[derive(Debug, Deserialize)]
struct SoilTypeProperties {
    most_probable_soil_type: String,
    #[serde(default)]
    probabilities: Vec<SoilTypeProbability>,
}

impl OpenEpiSoilClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl From<SoilTypeFeature> for SoilType {
    fn from(feature: SoilTypeFeature) -> Self {
        Self {
            most_probable: feature.properties.most_probable_soil_type,
            probabilities: feature.properties.probabilities,
        }
    }
}

#[async_trait]
impl SoilTypeProvider for OpenEpiSoilClient {
    async fn soil_type(&self, coords: GpsCoordinates) -> AppResult<SoilType> {
        let url = format!("{}/type", self.base_url);
        let query = [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("top_k", TOP_K.to_string()),
        ];
        let feature: SoilTypeFeature = get_json(&self.client, SERVICE, &url, &query).await?;
        Ok(feature.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soil_type_feature_converts() {
        let body = r#"{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [34.75, 0.28]},
            "properties": {
                "most_probable_soil_type": "Acrisols",
                "probabilities": [
                    {"soil_type": "Acrisols", "probability": 41},
                    {"soil_type": "Ferralsols", "probability": 30}
                ]
            }
        }"#;
        let feature: SoilTypeFeature = serde_json::from_str(body).unwrap();
        let soil: SoilType = feature.into();

        assert_eq!(soil.most_probable, "Acrisols");
        assert_eq!(soil.probabilities.len(), 2);
        assert_eq!(soil.probabilities[1].soil_type, "Ferralsols");
    }
}
