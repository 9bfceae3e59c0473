//! Soil sample stores
//!
//! A store only narrows candidates; exact haversine filtering and weighting
//! happen in `shared::aggregate`.

use async_trait::async_trait;
use serde::Serialize;
use shared::{bounding_box, dataset, nearest_sample, GpsCoordinates, SampleRecord};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStoreKind {
    Postgres,
    Static,
}

impl std::fmt::Display for SampleStoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleStoreKind::Postgres => write!(f, "postgres"),
            SampleStoreKind::Static => write!(f, "static"),
        }
    }
}

/// Source of georeferenced soil samples
#[async_trait]
pub trait SoilSampleStore: Send + Sync {
    /// Candidate samples around `target`; may include some beyond `radius_km`
    async fn samples_near(
        &self,
        target: GpsCoordinates,
        radius_km: f64,
    ) -> AppResult<Vec<SampleRecord>>;

    /// The closest sample with coordinates, if the store holds any
    async fn nearest(&self, target: GpsCoordinates) -> AppResult<Option<SampleRecord>>;

    fn kind(&self) -> SampleStoreKind;
}

/// Samples held in the `soil_samples` table
#[derive(Clone)]
pub struct PgSampleStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct SampleRow {
    latitude: Option<f64>,
    longitude: Option<f64>,
    ph: Option<f64>,
    n: Option<f64>,
    p: Option<f64>,
    k: Option<f64>,
}

impl From<SampleRow> for SampleRecord {
    fn from(row: SampleRow) -> Self {
        SampleRecord {
            latitude: row.latitude,
            longitude: row.longitude,
            ph: row.ph,
            nitrogen: row.n,
            phosphorus: row.p,
            potassium: row.k,
        }
    }
}

impl PgSampleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SoilSampleStore for PgSampleStore {
    async fn samples_near(
        &self,
        target: GpsCoordinates,
        radius_km: f64,
    ) -> AppResult<Vec<SampleRecord>> {
        let ((min_lat, min_lon), (max_lat, max_lon)) = bounding_box(target, radius_km);

        let rows = sqlx::query_as::<_, SampleRow>(
            r#"
            SELECT latitude, longitude, ph, n, p, k
            FROM soil_samples
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
            "#,
        )
        .bind(min_lat)
        .bind(max_lat)
        .bind(min_lon)
        .bind(max_lon)
        .fetch_all(&self.db)
        .await?;

        tracing::debug!(
            "Fetched {} candidate samples within the box around {}",
            rows.len(),
            target
        );

        Ok(rows.into_iter().map(SampleRecord::from).collect())
    }

    async fn nearest(&self, target: GpsCoordinates) -> AppResult<Option<SampleRecord>> {
        // Equirectangular ordering is monotonic with haversine at these scales
        let row = sqlx::query_as::<_, SampleRow>(
            r#"
            SELECT latitude, longitude, ph, n, p, k
            FROM soil_samples
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
            ORDER BY power(latitude - $1, 2)
                   + power((longitude - $2) * cos(radians($1)), 2)
            LIMIT 1
            "#,
        )
        .bind(target.latitude)
        .bind(target.longitude)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(SampleRecord::from))
    }

    fn kind(&self) -> SampleStoreKind {
        SampleStoreKind::Postgres
    }
}

/// Samples held in memory, by default the bundled reference set
#[derive(Debug, Clone)]
pub struct StaticSampleStore {
    samples: Vec<SampleRecord>,
}

impl StaticSampleStore {
    pub fn new(samples: Vec<SampleRecord>) -> Self {
        Self { samples }
    }

    pub fn bundled() -> AppResult<Self> {
        let samples = dataset::bundled_samples()
            .map_err(|e| AppError::Configuration(format!("Bundled soil samples: {}", e)))?;
        Ok(Self::new(samples))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[async_trait]
impl SoilSampleStore for StaticSampleStore {
    async fn samples_near(
        &self,
        target: GpsCoordinates,
        radius_km: f64,
    ) -> AppResult<Vec<SampleRecord>> {
        let ((min_lat, min_lon), (max_lat, max_lon)) = bounding_box(target, radius_km);
        Ok(self
            .samples
            .iter()
            .filter(|s| {
                s.coordinates().is_some_and(|c| {
                    (min_lat..=max_lat).contains(&c.latitude)
                        && (min_lon..=max_lon).contains(&c.longitude)
                })
            })
            .cloned()
            .collect())
    }

    async fn nearest(&self, target: GpsCoordinates) -> AppResult<Option<SampleRecord>> {
        Ok(nearest_sample(target, &self.samples).map(|(s, _)| s.clone()))
    }

    fn kind(&self) -> SampleStoreKind {
        SampleStoreKind::Static
    }
}
