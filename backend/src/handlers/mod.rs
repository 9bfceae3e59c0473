//! HTTP handlers for FarmIntel

pub mod advice;
pub mod crops;
pub mod health;

pub use advice::{get_advice, get_agri_advice, get_profile};
pub use crops::list_crops;
pub use health::health_check;

use axum::http::Uri;

use crate::error::AppError;

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {}", uri.path()))
}
