//! Great-circle distance and nearby-sample aggregation

use thiserror::Error;

use crate::models::{SampleRecord, SoilReading};
use crate::types::GpsCoordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Added to every distance before inverting, so a sample sitting on the
/// target gets weight 10 instead of infinity.
pub const IDW_DISTANCE_OFFSET_KM: f64 = 0.1;

/// Relative padding on bounding boxes; a box only narrows candidates, so
/// rounding at its edge must never exclude an in-radius sample
const BOUNDING_BOX_MARGIN: f64 = 1.001;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("no soil samples within {radius_km} km of {target}")]
    NoSamplesInRadius {
        target: GpsCoordinates,
        radius_km: f64,
    },
}

/// Haversine distance in kilometres between two points given in degrees
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn distance_between(a: GpsCoordinates, b: GpsCoordinates) -> f64 {
    distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Latitude/longitude box enclosing the haversine circle of `radius_km`.
/// Returns ((min_lat, min_lon), (max_lat, max_lon)).
pub fn bounding_box(center: GpsCoordinates, radius_km: f64) -> ((f64, f64), (f64, f64)) {
    let angular = radius_km / EARTH_RADIUS_KM * BOUNDING_BOX_MARGIN;
    let dlat = angular.to_degrees();

    // Widest longitude span of a spherical cap; a cap over a pole covers them all
    let ratio = angular.sin() / center.latitude.to_radians().cos();
    let dlon = if ratio.is_finite() && ratio < 1.0 {
        ratio.asin().to_degrees()
    } else {
        180.0
    };

    let (min_lon, max_lon) = if center.longitude - dlon < -180.0 || center.longitude + dlon > 180.0
    {
        // Crosses the antimeridian
        (-180.0, 180.0)
    } else {
        (center.longitude - dlon, center.longitude + dlon)
    };

    (
        ((center.latitude - dlat).max(-90.0), min_lon),
        ((center.latitude + dlat).min(90.0), max_lon),
    )
}

/// Samples with valid coordinates within `radius_km`, paired with their
/// distance and sorted nearest first
pub fn samples_within<'a>(
    target: GpsCoordinates,
    samples: &'a [SampleRecord],
    radius_km: f64,
) -> Vec<(&'a SampleRecord, f64)> {
    let mut nearby: Vec<(&SampleRecord, f64)> = samples
        .iter()
        .filter_map(|s| s.coordinates().map(|c| (s, distance_between(target, c))))
        .filter(|(_, d)| *d <= radius_km)
        .collect();
    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
    nearby
}

/// The closest sample with valid coordinates, regardless of distance
pub fn nearest_sample(
    target: GpsCoordinates,
    samples: &[SampleRecord],
) -> Option<(&SampleRecord, f64)> {
    samples
        .iter()
        .filter_map(|s| s.coordinates().map(|c| (s, distance_between(target, c))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Inverse-distance-weighted soil chemistry from the samples within
/// `radius_km` of `target`, using weight `1 / (d + 0.1)`.
pub fn aggregate(
    target: GpsCoordinates,
    samples: &[SampleRecord],
    radius_km: f64,
) -> Result<SoilReading, AggregationError> {
    let nearby = samples_within(target, samples, radius_km);
    if nearby.is_empty() {
        return Err(AggregationError::NoSamplesInRadius { target, radius_km });
    }

    let mut weight_sum = 0.0;
    let mut sums = [0.0_f64; 4];
    for (sample, distance) in &nearby {
        let weight = 1.0 / (distance + IDW_DISTANCE_OFFSET_KM);
        let reading = sample.reading();
        weight_sum += weight;
        sums[0] += weight * reading.ph;
        sums[1] += weight * reading.nitrogen;
        sums[2] += weight * reading.phosphorus;
        sums[3] += weight * reading.potassium;
    }

    Ok(SoilReading::new(
        sums[0] / weight_sum,
        sums[1] / weight_sum,
        sums[2] / weight_sum,
        sums[3] / weight_sum,
    ))
}

/// County name for the bundled western-Kenya sample region
pub fn infer_region(latitude: f64, longitude: f64) -> &'static str {
    if latitude > -1.5 && latitude < -1.0 && longitude > 36.5 && longitude < 37.0 {
        "Nairobi"
    } else if latitude > 0.0 {
        "Kakamega"
    } else {
        "Siaya"
    }
}
