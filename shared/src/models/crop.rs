//! Crop requirement profiles
//!
//! Static agronomic thresholds per crop. Nutrient bands are mg/kg.

use serde::Serialize;

/// Acceptable pH band for a crop
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

impl PhRange {
    pub fn contains(&self, ph: f64) -> bool {
        ph >= self.min && ph <= self.max
    }
}

/// Nutrient thresholds: `min` < `optimal` < `high`
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct NutrientBand {
    pub min: f64,
    pub optimal: f64,
    pub high: f64,
}

/// Where a measured nutrient value falls relative to a band
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NutrientTier {
    BelowMin,
    MinToOptimal,
    OptimalToHigh,
    AboveHigh,
}

impl NutrientBand {
    pub fn tier(&self, value: f64) -> NutrientTier {
        if value >= self.high {
            NutrientTier::AboveHigh
        } else if value >= self.optimal {
            NutrientTier::OptimalToHigh
        } else if value >= self.min {
            NutrientTier::MinToOptimal
        } else {
            NutrientTier::BelowMin
        }
    }
}

/// Agronomic requirements of a supported crop
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CropProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub ph: PhRange,
    pub nitrogen: NutrientBand,
    pub phosphorus: NutrientBand,
    pub potassium: NutrientBand,
    /// Legumes that fix atmospheric nitrogen
    pub nitrogen_fixing: bool,
}

static CROP_PROFILES: [CropProfile; 4] = [
    CropProfile {
        id: "maize",
        name: "Maize",
        ph: PhRange { min: 5.5, max: 7.5, optimal: 6.5 },
        nitrogen: NutrientBand { min: 30.0, optimal: 50.0, high: 80.0 },
        phosphorus: NutrientBand { min: 20.0, optimal: 35.0, high: 50.0 },
        potassium: NutrientBand { min: 150.0, optimal: 200.0, high: 250.0 },
        nitrogen_fixing: false,
    },
    CropProfile {
        id: "beans",
        name: "Beans",
        ph: PhRange { min: 6.0, max: 7.5, optimal: 6.5 },
        nitrogen: NutrientBand { min: 20.0, optimal: 30.0, high: 50.0 },
        phosphorus: NutrientBand { min: 25.0, optimal: 40.0, high: 60.0 },
        potassium: NutrientBand { min: 120.0, optimal: 180.0, high: 240.0 },
        nitrogen_fixing: true,
    },
    CropProfile {
        id: "peas",
        name: "Peas",
        ph: PhRange { min: 6.0, max: 7.5, optimal: 6.8 },
        nitrogen: NutrientBand { min: 15.0, optimal: 25.0, high: 40.0 },
        phosphorus: NutrientBand { min: 20.0, optimal: 35.0, high: 50.0 },
        potassium: NutrientBand { min: 100.0, optimal: 150.0, high: 200.0 },
        nitrogen_fixing: true,
    },
    CropProfile {
        id: "potatoes",
        name: "Potatoes",
        ph: PhRange { min: 5.0, max: 6.5, optimal: 5.8 },
        nitrogen: NutrientBand { min: 40.0, optimal: 60.0, high: 90.0 },
        phosphorus: NutrientBand { min: 30.0, optimal: 50.0, high: 70.0 },
        potassium: NutrientBand { min: 180.0, optimal: 250.0, high: 320.0 },
        nitrogen_fixing: false,
    },
];

/// Crop used when a request does not name one
pub const DEFAULT_CROP: &str = "maize";

/// All supported crops in table order
pub fn crops() -> &'static [CropProfile] {
    &CROP_PROFILES
}

/// Look up a crop by identifier, ignoring case and surrounding whitespace
pub fn find_crop(crop_id: &str) -> Option<&'static CropProfile> {
    let key = crop_id.trim();
    CROP_PROFILES.iter().find(|c| c.id.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_crop_case_insensitive() {
        assert_eq!(find_crop("Maize").map(|c| c.id), Some("maize"));
        assert_eq!(find_crop("  POTATOES ").map(|c| c.id), Some("potatoes"));
        assert!(find_crop("durian").is_none());
        assert!(find_crop("").is_none());
    }

    #[test]
    fn test_bands_are_ordered() {
        for crop in crops() {
            assert!(crop.ph.min < crop.ph.optimal && crop.ph.optimal < crop.ph.max, "{}", crop.id);
            for band in [crop.nitrogen, crop.phosphorus, crop.potassium] {
                assert!(band.min < band.optimal && band.optimal < band.high, "{}", crop.id);
            }
        }
    }

    #[test]
    fn test_nitrogen_fixers() {
        let fixers: Vec<_> = crops().iter().filter(|c| c.nitrogen_fixing).map(|c| c.id).collect();
        assert_eq!(fixers, vec!["beans", "peas"]);
    }

    #[test]
    fn test_nutrient_tier_boundaries() {
        let band = NutrientBand { min: 30.0, optimal: 50.0, high: 80.0 };
        assert_eq!(band.tier(29.9), NutrientTier::BelowMin);
        assert_eq!(band.tier(30.0), NutrientTier::MinToOptimal);
        assert_eq!(band.tier(50.0), NutrientTier::OptimalToHigh);
        assert_eq!(band.tier(80.0), NutrientTier::AboveHigh);
    }

    #[test]
    fn test_ph_range_inclusive() {
        let maize = find_crop(DEFAULT_CROP).unwrap();
        assert!(maize.ph.contains(5.5));
        assert!(maize.ph.contains(7.5));
        assert!(!maize.ph.contains(5.49));
    }
}
