//! Domain models for FarmIntel

mod crop;
mod soil;
mod suitability;

pub use crop::*;
pub use soil::*;
pub use suitability::*;
