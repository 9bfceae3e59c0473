//! Weather API client for fetching weather data
//!
//! Integrates with WeatherAPI.com for current conditions and daily forecasts

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::GpsCoordinates;

use super::{get_json, http_client, WeatherProvider};
use crate::error::AppResult;

const SERVICE: &str = "Weather API";

/// WeatherAPI.com accepts at most 14 forecast days
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Weather API client
#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub location_name: String,
    pub region: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    pub humidity_percent: i32,
    pub precipitation_mm: f64,
    pub wind_kph: f64,
    pub cloud_coverage_percent: i32,
    pub condition: String,
    pub icon: String,
}

/// Forecast for a single day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max_temp_celsius: f64,
    pub min_temp_celsius: f64,
    pub avg_temp_celsius: f64,
    pub total_precipitation_mm: f64,
    pub avg_humidity_percent: f64,
    pub chance_of_rain_percent: i32,
    pub condition: String,
}

/// Multi-day weather forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub days: Vec<DailyForecast>,
}

impl WeatherForecast {
    /// Days expected to bring at least `threshold_mm` of rain or a likely shower
    pub fn rainy_days(&self, threshold_mm: f64) -> Vec<&DailyForecast> {
        self.days
            .iter()
            .filter(|d| d.total_precipitation_mm >= threshold_mm || d.chance_of_rain_percent >= 50)
            .collect()
    }
}

/// WeatherAPI.com response for current.json
#[derive(Debug, Deserialize)]
struct WapiCurrentResponse {
    location: WapiLocation,
    current: WapiCurrent,
}

#[derive(Debug, Deserialize)]
struct WapiLocation {
    name: String,
    #[serde(default)]
    region: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WapiCurrent {
    last_updated_epoch: i64,
    temp_c: f64,
    feelslike_c: f64,
    humidity: i32,
    #[serde(default)]
    precip_mm: f64,
    #[serde(default)]
    wind_kph: f64,
    #[serde(default)]
    cloud: i32,
    condition: WapiCondition,
}

#[derive(Debug, Deserialize)]
struct WapiCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

/// WeatherAPI.com response for forecast.json
#[derive(Debug, Deserialize)]
struct WapiForecastResponse {
    location: WapiLocation,
    forecast: WapiForecast,
}

#[derive(Debug, Deserialize)]
struct WapiForecast {
    forecastday: Vec<WapiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WapiForecastDay {
    date: NaiveDate,
    day: WapiDay,
}

#[derive(Debug, Deserialize)]
struct WapiDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    #[serde(default)]
    totalprecip_mm: f64,
    #[serde(default)]
    avghumidity: f64,
    #[serde(default)]
    daily_chance_of_rain: i32,
    condition: WapiCondition,
}

impl WeatherApiClient {
    /// Create a new WeatherApiClient
    pub fn new(api_key: String, base_url: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn location_query(coords: GpsCoordinates) -> String {
        format!("{},{}", coords.latitude, coords.longitude)
    }

    /// Convert WeatherAPI current response to our format
    fn convert_current_response(data: WapiCurrentResponse) -> CurrentWeather {
        CurrentWeather {
            location_name: data.location.name,
            region: data.location.region,
            observed_at: DateTime::from_timestamp(data.current.last_updated_epoch, 0)
                .unwrap_or_else(Utc::now),
            temperature_celsius: data.current.temp_c,
            feels_like_celsius: data.current.feelslike_c,
            humidity_percent: data.current.humidity,
            precipitation_mm: data.current.precip_mm,
            wind_kph: data.current.wind_kph,
            cloud_coverage_percent: data.current.cloud,
            condition: data.current.condition.text,
            icon: data.current.condition.icon,
        }
    }

    /// Convert WeatherAPI forecast response to our format
    fn convert_forecast_response(data: WapiForecastResponse) -> WeatherForecast {
        let days = data
            .forecast
            .forecastday
            .into_iter()
            .map(|item| DailyForecast {
                date: item.date,
                max_temp_celsius: item.day.maxtemp_c,
                min_temp_celsius: item.day.mintemp_c,
                avg_temp_celsius: item.day.avgtemp_c,
                total_precipitation_mm: item.day.totalprecip_mm,
                avg_humidity_percent: item.day.avghumidity,
                chance_of_rain_percent: item.day.daily_chance_of_rain,
                condition: item.day.condition.text,
            })
            .collect();

        WeatherForecast {
            location_name: data.location.name,
            latitude: data.location.lat,
            longitude: data.location.lon,
            days,
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    /// Fetch current weather conditions by GPS coordinates
    async fn current(&self, coords: GpsCoordinates) -> AppResult<CurrentWeather> {
        let url = format!("{}/current.json", self.base_url);
        let query = [
            ("key", self.api_key.clone()),
            ("q", Self::location_query(coords)),
        ];
        let data: WapiCurrentResponse = get_json(&self.client, SERVICE, &url, &query).await?;
        Ok(Self::convert_current_response(data))
    }

    /// Fetch a daily forecast by GPS coordinates
    async fn forecast(&self, coords: GpsCoordinates, days: u8) -> AppResult<WeatherForecast> {
        let url = format!("{}/forecast.json", self.base_url);
        let query = [
            ("key", self.api_key.clone()),
            ("q", Self::location_query(coords)),
            ("days", days.clamp(1, MAX_FORECAST_DAYS).to_string()),
        ];
        let data: WapiForecastResponse = get_json(&self.client, SERVICE, &url, &query).await?;
        Ok(Self::convert_forecast_response(data))
    }
}
