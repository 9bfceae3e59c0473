//! Advice for a point: soil resolution, scoring and recommendation texts

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    aggregate, analyze, distance_between, generate_biodiversity_advice, generate_fertilizer_plan,
    infer_region, samples_within, validate_coordinates, validate_radius_km, AggregationError,
    GpsCoordinates, SoilReading, SuitabilityAnalysis,
};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use super::history::{AdviceHistory, AdviceRecord, DEFAULT_USER_ID};
use super::samples::SoilSampleStore;
use super::Settled;
use crate::config::AdviceConfig;
use crate::error::{AppError, AppResult};
use crate::external::{CurrentWeather, Geocoder, WeatherProvider};
use crate::AppState;

const WEATHER_UNAVAILABLE: &str = "Weather data not available for this location currently.";

/// Input for point advice
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdviceInput {
    pub lat: f64,
    pub lon: f64,
    #[validate(length(min = 1, max = 50, message = "Crop must be 1-50 characters"))]
    pub crop: Option<String>,
    #[validate(length(min = 1, max = 100, message = "User ID must be 1-100 characters"))]
    pub user_id: Option<String>,
    pub radius_km: Option<f64>,
    /// Measured chemistry; skips the sample lookup when present
    pub soil: Option<SoilReading>,
}

/// Where the soil chemistry of a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilSource {
    Provided,
    NearbySamples,
    NearestSample,
}

impl std::fmt::Display for SoilSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilSource::Provided => write!(f, "provided"),
            SoilSource::NearbySamples => write!(f, "nearby_samples"),
            SoilSource::NearestSample => write!(f, "nearest_sample"),
        }
    }
}

/// Soil chemistry resolved for a point
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSoil {
    pub soil: SoilReading,
    pub source: SoilSource,
    pub samples_used: usize,
    /// Distance to the sample used by the nearest-sample fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_sample_km: Option<f64>,
}

/// Analysis and recommendation texts for one crop
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAdvice {
    pub crop: String,
    pub analysis: SuitabilityAnalysis,
    pub fertilizer_plan: String,
    pub biodiversity_advice: String,
}

impl CropAdvice {
    pub fn build(area_name: &str, soil: &SoilReading, crop: &str) -> Self {
        let analysis = analyze(soil, crop);
        let fertilizer_plan = generate_fertilizer_plan(soil, crop, &analysis);
        let biodiversity_advice = generate_biodiversity_advice(area_name, soil, crop, &analysis);
        Self {
            crop: crop.to_string(),
            analysis,
            fertilizer_plan,
            biodiversity_advice,
        }
    }
}

/// Full response for point advice
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResponse {
    pub id: Uuid,
    pub user_id: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub soil: ResolvedSoil,
    #[serde(flatten)]
    pub advice: CropAdvice,
    pub weather: Settled<CurrentWeather>,
    pub created_at: DateTime<Utc>,
}

/// Advice orchestration over the configured stores and clients
#[derive(Clone)]
pub struct AdviceService {
    samples: Arc<dyn SoilSampleStore>,
    geocoder: Option<Arc<dyn Geocoder>>,
    weather: Option<Arc<dyn WeatherProvider>>,
    history: Arc<RwLock<AdviceHistory>>,
    settings: AdviceConfig,
}

impl AdviceService {
    pub fn new(state: &AppState) -> Self {
        Self {
            samples: state.samples.clone(),
            geocoder: state.geocoder.clone(),
            weather: state.weather.clone(),
            history: state.history.clone(),
            settings: state.config.advice.clone(),
        }
    }

    /// Compute advice for a point and record it in the user's history
    pub async fn advise(&self, input: AdviceInput) -> AppResult<AdviceResponse> {
        input.validate()?;
        validate_coordinates(input.lat, input.lon).map_err(|msg| {
            let field = if msg.starts_with("Longitude") { "lon" } else { "lat" };
            AppError::validation(field, msg)
        })?;
        let radius_km = input.radius_km.unwrap_or(self.settings.search_radius_km);
        validate_radius_km(radius_km).map_err(|msg| AppError::validation("radiusKm", msg))?;

        let target = GpsCoordinates::new(input.lat, input.lon);
        let crop = self.crop_or_default(input.crop.as_deref());
        let user_id = input
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_USER_ID)
            .to_string();

        let resolved = self.resolve_soil(target, radius_km, input.soil).await?;

        let (region, weather) = tokio::join!(self.region_for(target), self.current_weather(target));

        let soil = SoilReading {
            region: Some(region.clone()),
            ..resolved.soil.clone()
        };
        let advice = CropAdvice::build(&region, &soil, &crop);

        tracing::info!(
            "Advice for {} at {}: crop={} score={:.2} source={}",
            user_id,
            target,
            crop,
            advice.analysis.score,
            resolved.source
        );

        let response = AdviceResponse {
            id: Uuid::new_v4(),
            user_id,
            region,
            latitude: target.latitude,
            longitude: target.longitude,
            soil: ResolvedSoil { soil, ..resolved },
            advice,
            weather,
            created_at: Utc::now(),
        };

        self.record(&response).await;

        Ok(response)
    }

    /// Advice for a point without a user, sourced only from the sample store
    pub async fn advise_point(
        &self,
        target: GpsCoordinates,
        area_name: &str,
        crop: &str,
    ) -> AppResult<(ResolvedSoil, CropAdvice)> {
        let resolved = self
            .resolve_soil(target, self.settings.search_radius_km, None)
            .await?;
        let advice = CropAdvice::build(area_name, &resolved.soil, crop);
        Ok((resolved, advice))
    }

    /// Advice history for a user, newest first
    pub async fn history_for(&self, user_id: &str) -> Vec<AdviceRecord> {
        self.history.read().await.for_user(user_id)
    }

    pub fn crop_or_default(&self, crop: Option<&str>) -> String {
        crop.map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.settings.default_crop.as_str())
            .to_lowercase()
    }

    /// Supplied chemistry, else weighted nearby samples, else the nearest sample
    pub async fn resolve_soil(
        &self,
        target: GpsCoordinates,
        radius_km: f64,
        provided: Option<SoilReading>,
    ) -> AppResult<ResolvedSoil> {
        if let Some(soil) = provided {
            return Ok(ResolvedSoil {
                soil,
                source: SoilSource::Provided,
                samples_used: 0,
                nearest_sample_km: None,
            });
        }

        let candidates = self.samples.samples_near(target, radius_km).await?;
        match aggregate(target, &candidates, radius_km) {
            Ok(soil) => Ok(ResolvedSoil {
                soil,
                source: SoilSource::NearbySamples,
                samples_used: samples_within(target, &candidates, radius_km).len(),
                nearest_sample_km: None,
            }),
            Err(AggregationError::NoSamplesInRadius { .. }) => {
                tracing::debug!(
                    "No samples within {} km of {}, using nearest sample",
                    radius_km,
                    target
                );
                let sample = self
                    .samples
                    .nearest(target)
                    .await?
                    .ok_or(AppError::NoSoilSamples)?;

                Ok(ResolvedSoil {
                    soil: sample.reading(),
                    source: SoilSource::NearestSample,
                    samples_used: 1,
                    nearest_sample_km: sample.coordinates().map(|c| distance_between(target, c)),
                })
            }
        }
    }

    /// Region from the reverse geocoder, else the built-in county lookup
    async fn region_for(&self, target: GpsCoordinates) -> String {
        if let Some(geocoder) = &self.geocoder {
            match geocoder.reverse(target).await {
                Ok(Some(place)) => return place.region.unwrap_or(place.name),
                Ok(None) => tracing::debug!("Reverse geocoder found nothing at {}", target),
                Err(e) => tracing::warn!("Reverse geocoding failed for {}: {}", target, e),
            }
        }
        infer_region(target.latitude, target.longitude).to_string()
    }

    async fn current_weather(&self, target: GpsCoordinates) -> Settled<CurrentWeather> {
        match &self.weather {
            Some(provider) => {
                Settled::from_result(provider.current(target).await, "Weather", WEATHER_UNAVAILABLE)
            }
            None => Settled::failed(WEATHER_UNAVAILABLE),
        }
    }

    async fn record(&self, response: &AdviceResponse) {
        let record = AdviceRecord {
            id: response.id,
            user_id: response.user_id.clone(),
            created_at: response.created_at,
            region: response.region.clone(),
            coordinates: GpsCoordinates::new(response.latitude, response.longitude),
            crop: response.advice.crop.clone(),
            soil: response.soil.soil.clone(),
            score: response.advice.analysis.score,
            suitability: response.advice.analysis.suitability,
            probability: response.advice.analysis.probability,
            source: response.soil.source.to_string(),
        };
        let mut history = self.history.write().await;
        history.record(record);
        tracing::debug!("Advice history holds {} users", history.user_count());
    }
}
