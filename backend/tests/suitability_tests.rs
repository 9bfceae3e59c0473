//! Tests for crop suitability scoring
//! Verifies the pH gate, nutrient tier weights and the unknown-crop fallback

use proptest::prelude::*;
use shared::{
    analyze, crops, find_crop, ProbabilityTier, SoilReading, SuitabilityTier, UNKNOWN_CROP_SCORE,
};

fn soil(ph: f64, n: f64, p: f64, k: f64) -> SoilReading {
    SoilReading::new(ph, n, p, k)
}

// =============================================================================
// Reference Scenarios
// =============================================================================

mod reference_scenarios {
    use super::*;

    #[test]
    fn depleted_maize_soil_scores_poor() {
        // pH in band 0.30, N/P/K all below minimum 0.05 each
        let analysis = analyze(&soil(6.0, 10.0, 15.0, 20.0), "maize");
        assert_eq!(analysis.score, 0.45);
        assert_eq!(analysis.suitability, SuitabilityTier::Poor);
        assert_eq!(analysis.probability, ProbabilityTier::Low);
        assert_eq!(analysis.issues.len(), 3);
    }

    #[test]
    fn ph_gate_caps_rich_soil_at_seventy() {
        // Nutrients all above high: 0.25 + 0.25 + 0.20, pH contributes nothing
        let analysis = analyze(&soil(4.5, 100.0, 60.0, 300.0), "maize");
        assert_eq!(analysis.score, 0.70);
        assert_eq!(analysis.suitability, SuitabilityTier::Good);
        assert!(analysis.issues.iter().any(|i| i.contains("acidic")));
    }

    #[test]
    fn alkaline_soil_reported() {
        let analysis = analyze(&soil(8.2, 100.0, 60.0, 300.0), "maize");
        assert!(analysis.issues.iter().any(|i| i.contains("alkaline")));
    }

    #[test]
    fn ideal_potato_soil_is_excellent() {
        let analysis = analyze(&soil(5.8, 95.0, 75.0, 330.0), "potatoes");
        assert_eq!(analysis.score, 1.0);
        assert_eq!(analysis.suitability, SuitabilityTier::Excellent);
        assert_eq!(analysis.probability, ProbabilityTier::High);
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn optimal_band_scores_between_min_and_high() {
        // pH 0.30, N optimal 0.20, P optimal 0.20, K optimal 0.15
        let analysis = analyze(&soil(6.5, 55.0, 40.0, 210.0), "maize");
        assert_eq!(analysis.score, 0.85);
        assert_eq!(analysis.suitability, SuitabilityTier::Excellent);
    }
}

// =============================================================================
// Crop Lookup
// =============================================================================

mod crop_lookup {
    use super::*;

    #[test]
    fn crop_ids_match_case_insensitively() {
        let reading = soil(6.5, 40.0, 30.0, 160.0);
        assert_eq!(analyze(&reading, "BEANS"), analyze(&reading, "beans"));
        assert_eq!(analyze(&reading, " Peas "), analyze(&reading, "peas"));
    }

    #[test]
    fn unknown_crop_falls_back_to_medium() {
        let analysis = analyze(&soil(6.5, 40.0, 30.0, 160.0), "durian");
        assert_eq!(analysis.score, UNKNOWN_CROP_SCORE);
        assert_eq!(analysis.probability, ProbabilityTier::Medium);
        assert!(!analysis.recommendations.is_empty());
        assert!(analysis.recommendations[0].contains("maize"));
    }

    #[test]
    fn every_table_crop_is_found() {
        for crop in crops() {
            assert_eq!(find_crop(crop.id).map(|c| c.id), Some(crop.id));
        }
    }

    #[test]
    fn missing_chemistry_scores_as_zero() {
        let reading: SoilReading = serde_json::from_str(r#"{"pH": "6.0"}"#).unwrap();
        let analysis = analyze(&reading, "maize");
        assert_eq!(analysis.score, 0.45);
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

fn crop_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["maize", "beans", "peas", "potatoes"])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Scores stay between the all-deficient floor and 1.0
    #[test]
    fn score_is_bounded(
        crop in crop_strategy(),
        ph in 0.0f64..14.0,
        n in 0.0f64..200.0,
        p in 0.0f64..200.0,
        k in 0.0f64..500.0,
    ) {
        let analysis = analyze(&soil(ph, n, p, k), crop);
        prop_assert!(analysis.score >= 0.15);
        prop_assert!(analysis.score <= 1.0);
    }

    /// Soil at or above every high threshold with pH in band is excellent
    #[test]
    fn high_nutrients_in_band_are_excellent(
        crop in crop_strategy(),
        ph_frac in 0.0f64..=1.0,
        extra in 0.0f64..100.0,
    ) {
        let profile = find_crop(crop).unwrap();
        let ph = profile.ph.min + ph_frac * (profile.ph.max - profile.ph.min);
        let reading = soil(
            ph,
            profile.nitrogen.high + extra,
            profile.phosphorus.high + extra,
            profile.potassium.high + extra,
        );
        let analysis = analyze(&reading, crop);
        prop_assert!(analysis.score >= 0.95);
        prop_assert_eq!(analysis.suitability, SuitabilityTier::Excellent);
    }

    /// Raising one nutrient never lowers the score
    #[test]
    fn nitrogen_is_monotonic(
        crop in crop_strategy(),
        n in 0.0f64..150.0,
        bump in 0.0f64..50.0,
    ) {
        let low = analyze(&soil(6.5, n, 30.0, 150.0), crop);
        let high = analyze(&soil(6.5, n + bump, 30.0, 150.0), crop);
        prop_assert!(high.score >= low.score);
    }

    /// Tiers follow the score
    #[test]
    fn tiers_agree_with_score(
        crop in crop_strategy(),
        ph in 3.0f64..9.0,
        n in 0.0f64..120.0,
        p in 0.0f64..90.0,
        k in 0.0f64..400.0,
    ) {
        let analysis = analyze(&soil(ph, n, p, k), crop);
        prop_assert_eq!(analysis.suitability, SuitabilityTier::from_score(analysis.score));
        prop_assert_eq!(analysis.probability, ProbabilityTier::from_score(analysis.score));
    }
}
