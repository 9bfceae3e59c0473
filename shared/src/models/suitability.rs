//! Crop suitability scoring
//!
//! Scores a soil reading against a crop profile. pH is a gate worth 0.30,
//! N and P are worth up to 0.25 each, K up to 0.20.

use serde::{Deserialize, Serialize};

use super::crop::{find_crop, CropProfile, NutrientBand, NutrientTier};
use super::soil::SoilReading;

/// Likelihood of a successful crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProbabilityTier {
    Low,
    Medium,
    High,
}

impl ProbabilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.80 {
            ProbabilityTier::High
        } else if score >= 0.60 {
            ProbabilityTier::Medium
        } else {
            ProbabilityTier::Low
        }
    }
}

impl std::fmt::Display for ProbabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbabilityTier::Low => write!(f, "Low"),
            ProbabilityTier::Medium => write!(f, "Medium"),
            ProbabilityTier::High => write!(f, "High"),
        }
    }
}

/// Overall soil suitability for a crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SuitabilityTier {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SuitabilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            SuitabilityTier::Excellent
        } else if score >= 0.70 {
            SuitabilityTier::Good
        } else if score >= 0.50 {
            SuitabilityTier::Fair
        } else {
            SuitabilityTier::Poor
        }
    }
}

impl std::fmt::Display for SuitabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuitabilityTier::Poor => write!(f, "Poor"),
            SuitabilityTier::Fair => write!(f, "Fair"),
            SuitabilityTier::Good => write!(f, "Good"),
            SuitabilityTier::Excellent => write!(f, "Excellent"),
        }
    }
}

/// Result of scoring a soil reading against a crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityAnalysis {
    pub probability: ProbabilityTier,
    pub suitability: SuitabilityTier,
    /// In [0, 1], rounded to two decimals
    pub score: f64,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SuitabilityAnalysis {
    /// Result for a crop identifier missing from the table
    pub fn unknown_crop(crop_id: &str) -> Self {
        let supported: Vec<&str> = super::crop::crops().iter().map(|c| c.id).collect();
        Self {
            probability: ProbabilityTier::Medium,
            suitability: SuitabilityTier::from_score(UNKNOWN_CROP_SCORE),
            score: UNKNOWN_CROP_SCORE,
            issues: vec![format!("Unknown crop: {}", crop_id.trim())],
            recommendations: vec![format!(
                "No agronomic profile for '{}'. Supported crops: {}",
                crop_id.trim(),
                supported.join(", ")
            )],
        }
    }
}

pub const UNKNOWN_CROP_SCORE: f64 = 0.5;

const PH_WEIGHT: f64 = 0.30;
const N_SCHEDULE: [f64; 4] = [0.25, 0.20, 0.15, 0.05];
const P_SCHEDULE: [f64; 4] = [0.25, 0.20, 0.15, 0.05];
const K_SCHEDULE: [f64; 4] = [0.20, 0.15, 0.10, 0.05];

/// Score a soil reading for a crop. Unknown crops fall back to a neutral
/// Medium/0.5 result rather than failing.
pub fn analyze(soil: &SoilReading, crop_id: &str) -> SuitabilityAnalysis {
    match find_crop(crop_id) {
        Some(crop) => analyze_profile(soil, crop),
        None => SuitabilityAnalysis::unknown_crop(crop_id),
    }
}

pub fn analyze_profile(soil: &SoilReading, crop: &CropProfile) -> SuitabilityAnalysis {
    let mut score = 0.0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if crop.ph.contains(soil.ph) {
        score += PH_WEIGHT;
        recommendations.push(format!(
            "✅ Soil pH {:.1} is within the {:.1}-{:.1} range for {}",
            soil.ph, crop.ph.min, crop.ph.max, crop.name
        ));
    } else if soil.ph < crop.ph.min {
        issues.push(format!("Soil too acidic (pH {:.1} < {:.1})", soil.ph, crop.ph.min));
        recommendations.push(format!(
            "❌ Soil pH {:.1} is too acidic for {}: raise it towards {:.1} with agricultural lime",
            soil.ph, crop.name, crop.ph.optimal
        ));
    } else {
        issues.push(format!("Soil too alkaline (pH {:.1} > {:.1})", soil.ph, crop.ph.max));
        recommendations.push(format!(
            "❌ Soil pH {:.1} is too alkaline for {}: lower it towards {:.1} with sulphur or acidifying amendments",
            soil.ph, crop.name, crop.ph.optimal
        ));
    }

    score += score_nutrient(
        "Nitrogen",
        soil.nitrogen,
        &crop.nitrogen,
        N_SCHEDULE,
        &mut issues,
        &mut recommendations,
    );
    score += score_nutrient(
        "Phosphorus",
        soil.phosphorus,
        &crop.phosphorus,
        P_SCHEDULE,
        &mut issues,
        &mut recommendations,
    );
    score += score_nutrient(
        "Potassium",
        soil.potassium,
        &crop.potassium,
        K_SCHEDULE,
        &mut issues,
        &mut recommendations,
    );

    let score = ((score * 100.0).round() / 100.0).clamp(0.0, 1.0);

    SuitabilityAnalysis {
        probability: ProbabilityTier::from_score(score),
        suitability: SuitabilityTier::from_score(score),
        score,
        issues,
        recommendations,
    }
}

fn score_nutrient(
    label: &str,
    value: f64,
    band: &NutrientBand,
    schedule: [f64; 4],
    issues: &mut Vec<String>,
    recommendations: &mut Vec<String>,
) -> f64 {
    match band.tier(value) {
        NutrientTier::AboveHigh => {
            recommendations.push(format!("✅ {} is high ({:.0} mg/kg)", label, value));
            schedule[0]
        }
        NutrientTier::OptimalToHigh => {
            recommendations.push(format!("✅ {} is at optimal level ({:.0} mg/kg)", label, value));
            schedule[1]
        }
        NutrientTier::MinToOptimal => {
            recommendations.push(format!(
                "⚠️ {} is adequate ({:.0} mg/kg) but below the optimal {:.0} mg/kg",
                label, value, band.optimal
            ));
            schedule[2]
        }
        NutrientTier::BelowMin => {
            issues.push(format!(
                "{} deficiency ({:.0} mg/kg < {:.0} mg/kg)",
                label, value, band.min
            ));
            recommendations.push(format!(
                "❌ {} is deficient ({:.0} mg/kg); at least {:.0} mg/kg is required",
                label, value, band.min
            ));
            schedule[3]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_tiers() {
        assert_eq!(SuitabilityTier::from_score(0.85), SuitabilityTier::Excellent);
        assert_eq!(SuitabilityTier::from_score(0.84), SuitabilityTier::Good);
        assert_eq!(SuitabilityTier::from_score(0.70), SuitabilityTier::Good);
        assert_eq!(SuitabilityTier::from_score(0.50), SuitabilityTier::Fair);
        assert_eq!(SuitabilityTier::from_score(0.49), SuitabilityTier::Poor);
    }

    #[test]
    fn test_probability_tiers() {
        assert_eq!(ProbabilityTier::from_score(0.80), ProbabilityTier::High);
        assert_eq!(ProbabilityTier::from_score(0.60), ProbabilityTier::Medium);
        assert_eq!(ProbabilityTier::from_score(0.59), ProbabilityTier::Low);
    }

    #[test]
    fn test_all_high_scores_full_marks() {
        let soil = SoilReading::new(6.5, 90.0, 60.0, 300.0);
        let analysis = analyze(&soil, "maize");
        assert_eq!(analysis.score, 1.0);
        assert_eq!(analysis.suitability, SuitabilityTier::Excellent);
        assert_eq!(analysis.probability, ProbabilityTier::High);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.recommendations.len(), 4);
    }

    #[test]
    fn test_ph_gate_weight() {
        let soil = SoilReading::new(4.5, 90.0, 60.0, 300.0);
        let analysis = analyze(&soil, "maize");
        assert_eq!(analysis.score, 0.70);
        assert_eq!(analysis.suitability, SuitabilityTier::Good);
        assert_eq!(analysis.issues.len(), 1);
        assert!(analysis.issues[0].contains("acidic"));
    }

    #[test]
    fn test_alkaline_issue() {
        let soil = SoilReading::new(8.2, 90.0, 60.0, 300.0);
        let analysis = analyze(&soil, "potatoes");
        assert!(analysis.issues[0].contains("alkaline"));
        assert!(analysis.recommendations[0].contains("lower"));
    }

    #[test]
    fn test_depleted_maize_scenario() {
        let soil = SoilReading::new(6.0, 10.0, 15.0, 20.0);
        let analysis = analyze(&soil, "maize");
        assert_eq!(analysis.score, 0.45);
        assert_eq!(analysis.suitability, SuitabilityTier::Poor);
        assert_eq!(analysis.probability, ProbabilityTier::Low);
        assert_eq!(analysis.issues.len(), 3);
    }

    #[test]
    fn test_middle_tiers() {
        // N optimal tier, P min tier, K min tier
        let soil = SoilReading::new(6.0, 55.0, 25.0, 160.0);
        let analysis = analyze(&soil, "maize");
        assert_eq!(analysis.score, 0.75);
        assert_eq!(analysis.probability, ProbabilityTier::Medium);
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn test_unknown_crop_fallback() {
        let analysis = analyze(&SoilReading::new(6.0, 10.0, 10.0, 10.0), "durian");
        assert_eq!(analysis.probability, ProbabilityTier::Medium);
        assert_eq!(analysis.score, 0.5);
        assert!(!analysis.recommendations.is_empty());
        assert!(analysis.issues[0].contains("durian"));
    }

    #[test]
    fn test_crop_lookup_ignores_case() {
        let soil = SoilReading::new(6.0, 10.0, 15.0, 20.0);
        assert_eq!(analyze(&soil, "MAIZE"), analyze(&soil, "maize"));
    }
}
