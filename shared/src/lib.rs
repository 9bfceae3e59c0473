//! Shared agronomy core for FarmIntel
//!
//! Soil models, crop profiles, suitability scoring, fertilizer and
//! biodiversity recommendations, and nearby-sample aggregation. Everything
//! here is pure and synchronous; the backend and the WASM module call into it.

pub mod dataset;
pub mod geo;
pub mod models;
pub mod recommendations;
pub mod types;
pub mod validation;

pub use geo::*;
pub use models::*;
pub use recommendations::*;
pub use types::*;
pub use validation::*;
