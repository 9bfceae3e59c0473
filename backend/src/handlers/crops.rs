//! Crop table handler

use axum::Json;
use shared::{crops, CropProfile};

/// Supported crops and their soil requirements
pub async fn list_crops() -> Json<&'static [CropProfile]> {
    Json(crops())
}
