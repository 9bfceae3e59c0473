//! Text recommendations built from a suitability analysis

mod biodiversity;
mod fertilizer;

pub use biodiversity::*;
pub use fertilizer::*;
