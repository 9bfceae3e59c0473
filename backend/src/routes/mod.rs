//! Route definitions for FarmIntel

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/crops", get(handlers::list_crops))
        .route("/advice", post(handlers::get_advice))
        .route("/get-agri-advice", post(handlers::get_agri_advice))
        .route("/profile/:user_id", get(handlers::get_profile))
}
