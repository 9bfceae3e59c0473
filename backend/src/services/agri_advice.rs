//! Advice for a named location
//!
//! Geocodes the query, then fetches the forecast, the soil type and the
//! optional crop advice concurrently. Each of those settles independently.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::validate_location_query;
use validator::Validate;

use super::advice::{AdviceService, CropAdvice, ResolvedSoil};
use super::Settled;
use crate::error::{AppError, AppResult};
use crate::external::soil::SoilType;
use crate::external::{GeocodedPlace, Geocoder, SoilTypeProvider, WeatherForecast, WeatherProvider};
use crate::AppState;

const WEATHER_UNAVAILABLE: &str = "Weather data not available for this location currently.";
const SOIL_UNAVAILABLE: &str = "Soil data not available for this specific location.";
const ADVICE_UNAVAILABLE: &str = "Crop advice not available for this location.";

/// Rain total that marks a forecast day as rainy
const RAINY_DAY_THRESHOLD_MM: f64 = 5.0;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AgriAdviceInput {
    /// Free-text place name; kept loose so a non-string is a 400, not a decode error
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[validate(length(min = 1, max = 50, message = "Crop must be 1-50 characters"))]
    pub crop: Option<String>,
}

impl AgriAdviceInput {
    fn location_str(&self) -> &str {
        self.location.as_ref().and_then(|v| v.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    #[serde(flatten)]
    pub forecast: WeatherForecast,
    pub rainy_days: Vec<NaiveDate>,
}

impl From<WeatherForecast> for ForecastSummary {
    fn from(forecast: WeatherForecast) -> Self {
        let rainy_days = forecast
            .rainy_days(RAINY_DAY_THRESHOLD_MM)
            .into_iter()
            .map(|d| d.date)
            .collect();
        Self {
            forecast,
            rainy_days,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAdvice {
    #[serde(flatten)]
    pub soil: ResolvedSoil,
    #[serde(flatten)]
    pub advice: CropAdvice,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgriAdviceResponse {
    pub location: GeocodedPlace,
    pub weather: Settled<ForecastSummary>,
    pub soil: Settled<SoilType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<Settled<PointAdvice>>,
}

#[derive(Clone)]
pub struct AgriAdviceService {
    geocoder: Option<Arc<dyn Geocoder>>,
    weather: Option<Arc<dyn WeatherProvider>>,
    soil: Option<Arc<dyn SoilTypeProvider>>,
    advice: AdviceService,
    forecast_days: u8,
}

impl AgriAdviceService {
    pub fn new(state: &AppState) -> Self {
        Self {
            geocoder: state.geocoder.clone(),
            weather: state.weather.clone(),
            soil: state.soil.clone(),
            advice: AdviceService::new(state),
            forecast_days: state.config.weather.forecast_days,
        }
    }

    pub async fn get_advice(&self, input: AgriAdviceInput) -> AppResult<AgriAdviceResponse> {
        let query = input.location_str().trim();
        validate_location_query(query).map_err(|msg| AppError::validation("location", msg))?;
        input.validate()?;

        let place = self.locate(query).await?;
        tracing::info!(
            "Resolved '{}' to {} ({})",
            query,
            place.name,
            place.coordinates()
        );

        let crop = input
            .crop
            .as_deref()
            .map(|c| self.advice.crop_or_default(Some(c)));

        let (weather, soil, advice) = tokio::join!(
            self.forecast(&place),
            self.soil_type(&place),
            self.point_advice(&place, crop.as_deref()),
        );

        Ok(AgriAdviceResponse {
            location: place,
            weather,
            soil,
            advice,
        })
    }

    async fn locate(&self, query: &str) -> AppResult<GeocodedPlace> {
        let Some(geocoder) = &self.geocoder else {
            tracing::warn!("Geocoding is disabled; cannot resolve '{}'", query);
            return Err(AppError::LocationNotFound);
        };

        match geocoder.forward(query).await {
            Ok(Some(place)) => Ok(place),
            Ok(None) => Err(AppError::LocationNotFound),
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", query, e);
                Err(AppError::LocationNotFound)
            }
        }
    }

    async fn forecast(&self, place: &GeocodedPlace) -> Settled<ForecastSummary> {
        match &self.weather {
            Some(provider) => Settled::from_result(
                provider
                    .forecast(place.coordinates(), self.forecast_days)
                    .await
                    .map(ForecastSummary::from),
                "Forecast",
                WEATHER_UNAVAILABLE,
            ),
            None => Settled::failed(WEATHER_UNAVAILABLE),
        }
    }

    async fn soil_type(&self, place: &GeocodedPlace) -> Settled<SoilType> {
        match &self.soil {
            Some(provider) => Settled::from_result(
                provider.soil_type(place.coordinates()).await,
                "Soil type",
                SOIL_UNAVAILABLE,
            ),
            None => Settled::failed(SOIL_UNAVAILABLE),
        }
    }

    async fn point_advice(
        &self,
        place: &GeocodedPlace,
        crop: Option<&str>,
    ) -> Option<Settled<PointAdvice>> {
        let crop = crop?;
        let area = place.region.as_deref().unwrap_or(&place.name);
        let result = self
            .advice
            .advise_point(place.coordinates(), area, crop)
            .await
            .map(|(soil, advice)| PointAdvice { soil, advice });
        Some(Settled::from_result(result, "Crop advice", ADVICE_UNAVAILABLE))
    }
}
