//! External API integrations
//!
//! Each remote capability sits behind a trait so the application state can
//! hold `Option<Arc<dyn Trait>>` and fall back cleanly when one is missing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::GpsCoordinates;

use crate::error::{AppError, AppResult};

pub mod geocoder;
pub mod soil;
pub mod weather;

pub use geocoder::OpenEpiGeocoder;
pub use soil::OpenEpiSoilClient;
pub use weather::{CurrentWeather, WeatherApiClient, WeatherForecast};

/// A place resolved by a geocoder
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeocodedPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// County or state, when the geocoder reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl GeocodedPlace {
    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}

/// Forward and reverse geocoding
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a free-text query, `None` when nothing matches
    async fn forward(&self, query: &str) -> AppResult<Option<GeocodedPlace>>;

    /// Nearest named place for a point
    async fn reverse(&self, coords: GpsCoordinates) -> AppResult<Option<GeocodedPlace>>;
}

/// Current conditions and daily forecasts
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, coords: GpsCoordinates) -> AppResult<CurrentWeather>;

    async fn forecast(&self, coords: GpsCoordinates, days: u8) -> AppResult<WeatherForecast>;
}

/// Soil classification for a point
#[async_trait]
pub trait SoilTypeProvider: Send + Sync {
    async fn soil_type(&self, coords: GpsCoordinates) -> AppResult<soil::SoilType>;
}

/// Build an HTTP client with the per-request timeout applied
pub(crate) fn http_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// GET a URL and decode the JSON body, labelling failures with `service`
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &str,
    url: &str,
    query: &[(&str, String)],
) -> AppResult<T> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| AppError::ExternalService(format!("{} request failed: {}", service, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ExternalService(format!(
            "{} error: {} - {}",
            service, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| {
            AppError::ExternalService(format!("Failed to parse {} response: {}", service, e))
        })
}
