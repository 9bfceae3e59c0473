//! Validation utilities for FarmIntel requests

/// Largest search radius accepted for nearby-sample aggregation
pub const MAX_SEARCH_RADIUS_KM: f64 = 500.0;

/// Validate latitude and longitude ranges
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a free-text location query
pub fn validate_location_query(location: &str) -> Result<(), &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Please provide a valid location string in the request body.");
    }
    if trimmed.len() > 200 {
        return Err("Location must be at most 200 characters");
    }
    Ok(())
}

/// Validate a search radius in kilometres
pub fn validate_radius_km(radius_km: f64) -> Result<(), &'static str> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err("Search radius must be a positive number of kilometres");
    }
    if radius_km > MAX_SEARCH_RADIUS_KM {
        return Err("Search radius must be at most 500 km");
    }
    Ok(())
}
