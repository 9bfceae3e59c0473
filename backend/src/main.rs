//! FarmIntel - Backend Server
//!
//! Soil suitability scoring, fertilizer plans and biodiversity advice for
//! smallholder farms, backed by georeferenced soil samples and optional
//! geocoding, weather and soil-type services.

use axum::{http::HeaderValue, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use external::{
    Geocoder, OpenEpiGeocoder, OpenEpiSoilClient, SoilTypeProvider, WeatherApiClient,
    WeatherProvider,
};
use services::{AdviceHistory, PgSampleStore, SoilSampleStore, StaticSampleStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Option<sqlx::PgPool>,
    pub config: Arc<Config>,
    pub samples: Arc<dyn SoilSampleStore>,
    pub geocoder: Option<Arc<dyn Geocoder>>,
    pub weather: Option<Arc<dyn WeatherProvider>>,
    pub soil: Option<Arc<dyn SoilTypeProvider>>,
    pub history: Arc<RwLock<AdviceHistory>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmintel_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting FarmIntel Server");
    tracing::info!("Environment: {}", config.environment);

    let db = connect_database(&config).await?;

    let samples: Arc<dyn SoilSampleStore> = match &db {
        Some(pool) => Arc::new(PgSampleStore::new(pool.clone())),
        None => {
            let store = StaticSampleStore::bundled()?;
            if store.is_empty() {
                tracing::warn!("Bundled soil sample set is empty");
            }
            tracing::info!("No database configured, using {} bundled soil samples", store.len());
            Arc::new(store)
        }
    };

    // Create application state
    let state = AppState {
        db,
        config: Arc::new(config.clone()),
        samples,
        geocoder: build_geocoder(&config)?,
        weather: build_weather(&config)?,
        soil: build_soil(&config)?,
        history: Arc::new(RwLock::new(AdviceHistory::new(
            config.history.per_user_capacity,
            config.history.max_users,
        ))),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect to the sample database when one is configured
async fn connect_database(config: &Config) -> anyhow::Result<Option<sqlx::PgPool>> {
    let Some(url) = &config.database.url else {
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    Ok(Some(db_pool))
}

fn build_geocoder(config: &Config) -> anyhow::Result<Option<Arc<dyn Geocoder>>> {
    if !config.geocoder.enabled {
        tracing::info!("Geocoding disabled");
        return Ok(None);
    }
    let client = OpenEpiGeocoder::new(
        config.geocoder.api_endpoint.clone(),
        config.advice.request_timeout_secs,
    )?;
    Ok(Some(Arc::new(client)))
}

fn build_weather(config: &Config) -> anyhow::Result<Option<Arc<dyn WeatherProvider>>> {
    let Some(api_key) = config.weather.api_key.clone().filter(|k| !k.trim().is_empty()) else {
        tracing::warn!("No weather API key configured, weather data will be unavailable");
        return Ok(None);
    };
    let client = WeatherApiClient::new(
        api_key,
        config.weather.api_endpoint.clone(),
        config.advice.request_timeout_secs,
    )?;
    Ok(Some(Arc::new(client)))
}

fn build_soil(config: &Config) -> anyhow::Result<Option<Arc<dyn SoilTypeProvider>>> {
    if !config.soil.enabled {
        tracing::info!("Soil type lookups disabled");
        return Ok(None);
    }
    let client = OpenEpiSoilClient::new(
        config.soil.api_endpoint.clone(),
        config.advice.request_timeout_secs,
    )?;
    Ok(Some(Arc::new(client)))
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors.allowed_origins))
        .with_state(state)
}

/// CORS configuration; an empty origin list allows any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint
async fn root() -> &'static str {
    "FarmIntel Agronomy Advice API v1.0"
}
