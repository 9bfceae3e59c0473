//! OpenEPI geocoding client
//!
//! Forward and reverse lookups return GeoJSON feature collections; the first
//! feature is taken as the best match.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::GpsCoordinates;

use super::{get_json, http_client, GeocodedPlace, Geocoder};
use crate::error::AppResult;

const SERVICE: &str = "Geocoding API";

/// OpenEPI geocoding client
#[derive(Clone)]
pub struct OpenEpiGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Point,
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct Point {
    /// `[longitude, latitude]`
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    name: Option<String>,
    city: Option<String>,
    county: Option<String>,
    state: Option<String>,
}

impl OpenEpiGeocoder {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn first_place(collection: FeatureCollection, fallback_name: &str) -> Option<GeocodedPlace> {
        collection
            .features
            .into_iter()
            .find_map(|feature| Self::convert_feature(feature, fallback_name))
    }

    fn convert_feature(feature: Feature, fallback_name: &str) -> Option<GeocodedPlace> {
        let (longitude, latitude) = match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] if lat.is_finite() && lon.is_finite() => (*lon, *lat),
            _ => return None,
        };
        let props = feature.properties;
        let region = props.county.clone().or_else(|| props.state.clone());
        let name = props
            .name
            .or(props.city)
            .or_else(|| region.clone())
            .unwrap_or_else(|| fallback_name.to_string());

        Some(GeocodedPlace {
            name,
            latitude,
            longitude,
            region,
        })
    }
}

#[async_trait]
impl Geocoder for OpenEpiGeocoder {
    async fn forward(&self, query: &str) -> AppResult<Option<GeocodedPlace>> {
        let url = format!("{}/", self.base_url);
        let collection: FeatureCollection =
            get_json(&self.client, SERVICE, &url, &[("q", query.to_string())]).await?;
        Ok(Self::first_place(collection, query))
    }

    async fn reverse(&self, coords: GpsCoordinates) -> AppResult<Option<GeocodedPlace>> {
        let url = format!("{}/reverse", self.base_url);
        let query = [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ];
        let collection: FeatureCollection = get_json(&self.client, SERVICE, &url, &query).await?;
        Ok(Self::first_place(collection, &coords.to_string()))
    }
}
