//! HTTP handlers for advice endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::advice::{AdviceInput, AdviceResponse};
use crate::services::agri_advice::{AgriAdviceInput, AgriAdviceResponse};
use crate::services::{AdviceRecord, AdviceService, AgriAdviceService};
use crate::AppState;

/// Advice for a coordinate pair
pub async fn get_advice(
    State(state): State<AppState>,
    Json(input): Json<AdviceInput>,
) -> AppResult<Json<AdviceResponse>> {
    let service = AdviceService::new(&state);
    let response = service.advise(input).await?;
    Ok(Json(response))
}

/// Advice for a named location
pub async fn get_agri_advice(
    State(state): State<AppState>,
    Json(input): Json<AgriAdviceInput>,
) -> AppResult<Json<AgriAdviceResponse>> {
    let service = AgriAdviceService::new(&state);
    let response = service.get_advice(input).await?;
    Ok(Json(response))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub history: Vec<AdviceRecord>,
}

/// A user's advice history, newest first
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let service = AdviceService::new(&state);
    let history = service.history_for(&user_id).await;
    Ok(Json(ProfileResponse { user_id, history }))
}
