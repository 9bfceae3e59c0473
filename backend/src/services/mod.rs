//! Business logic services for FarmIntel

use serde::Serialize;

use crate::error::AppResult;

pub mod advice;
pub mod agri_advice;
pub mod history;
pub mod samples;

pub use advice::AdviceService;
pub use agri_advice::AgriAdviceService;
pub use history::{AdviceHistory, AdviceRecord};
pub use samples::{PgSampleStore, SoilSampleStore, StaticSampleStore};

/// Outcome of an optional lookup that must not fail the whole response.
/// Serializes as the value itself or as `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Settled<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> Settled<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        Settled::Failed {
            error: message.into(),
        }
    }

    /// Keep the value, or log the failure and substitute `message`
    pub fn from_result(result: AppResult<T>, what: &str, message: &str) -> Self {
        match result {
            Ok(value) => Settled::Ready(value),
            Err(e) => {
                tracing::warn!("{} lookup failed: {}", what, e);
                Settled::failed(message)
            }
        }
    }
}
