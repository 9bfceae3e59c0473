//! Tests for fertilizer plans and biodiversity advice
//! Verifies section selection by nutrient tier, score band and crop family

use proptest::prelude::*;
use shared::{
    analyze, generate_biodiversity_advice, generate_fertilizer_plan, SoilReading,
    OVER_FERTILIZATION_WARNING_SCORE,
};

fn plan(soil: &SoilReading, crop: &str) -> String {
    let analysis = analyze(soil, crop);
    generate_fertilizer_plan(soil, crop, &analysis)
}

fn biodiversity(area: &str, soil: &SoilReading, crop: &str) -> String {
    let analysis = analyze(soil, crop);
    generate_biodiversity_advice(area, soil, crop, &analysis)
}

// =============================================================================
// Fertilizer Plan
// =============================================================================

mod fertilizer_plan {
    use super::*;

    #[test]
    fn depleted_soil_gets_critical_language_for_every_nutrient() {
        let text = plan(&SoilReading::new(6.0, 10.0, 15.0, 20.0), "maize");
        assert!(text.contains("CRITICAL NITROGEN DEFICIENCY"));
        assert!(text.contains("CRITICAL PHOSPHORUS DEFICIENCY"));
        assert!(text.contains("CRITICAL POTASSIUM DEFICIENCY"));
        assert!(!text.contains("## 6. Avoid over-fertilization"));
    }

    #[test]
    fn sections_appear_in_order() {
        let text = plan(&SoilReading::new(6.0, 10.0, 15.0, 20.0), "maize");
        let positions: Vec<usize> = [
            "## 1. pH management",
            "## 2. Organic matter",
            "## 3. Nitrogen (N)",
            "## 4. Phosphorus (P)",
            "## 5. Potassium (K)",
        ]
        .iter()
        .map(|heading| text.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn acidic_soil_gets_lime() {
        let text = plan(&SoilReading::new(4.8, 60.0, 40.0, 220.0), "maize");
        assert!(text.contains("agricultural lime"));
    }

    #[test]
    fn alkaline_soil_gets_sulphur() {
        let text = plan(&SoilReading::new(8.1, 60.0, 40.0, 220.0), "maize");
        assert!(text.contains("elemental sulphur"));
    }

    #[test]
    fn legumes_get_rhizobium_advice() {
        let text = plan(&SoilReading::new(6.5, 5.0, 45.0, 200.0), "beans");
        assert!(text.contains("Rhizobium"));
    }

    #[test]
    fn well_scoring_soil_gets_over_fertilization_warning() {
        let soil = SoilReading::new(6.5, 90.0, 55.0, 260.0);
        assert!(analyze(&soil, "maize").score >= OVER_FERTILIZATION_WARNING_SCORE);
        assert!(plan(&soil, "maize").contains("## 6. Avoid over-fertilization"));
    }

    #[test]
    fn unknown_crop_gets_organic_guidance_only() {
        let text = plan(&SoilReading::new(6.5, 40.0, 30.0, 160.0), "durian");
        assert!(text.contains("## 2. Organic matter"));
        assert!(!text.contains("## 3. Nitrogen (N)"));
    }
}

// =============================================================================
// Biodiversity Advice
// =============================================================================

mod biodiversity_advice {
    use super::*;

    #[test]
    fn bands_follow_score() {
        let poor = biodiversity("Siaya", &SoilReading::new(6.0, 10.0, 15.0, 20.0), "maize");
        let fair = biodiversity("Siaya", &SoilReading::new(6.0, 35.0, 25.0, 20.0), "maize");
        let good = biodiversity("Siaya", &SoilReading::new(6.5, 90.0, 60.0, 300.0), "maize");

        assert!(poor.contains("Intensive restoration"));
        assert!(fair.contains("Moderate restoration"));
        assert!(good.contains("Maintain biodiversity"));
    }

    #[test]
    fn legumes_get_rotation_and_cereals_get_intercropping() {
        let soil = SoilReading::new(6.5, 30.0, 40.0, 180.0);
        assert!(biodiversity("Kakamega", &soil, "beans").contains("Crop rotation"));
        assert!(biodiversity("Kakamega", &soil, "potatoes").contains("Intercropping with legumes"));
    }

    #[test]
    fn five_year_plan_names_the_crop() {
        let text = biodiversity("Kakamega", &SoilReading::new(6.5, 30.0, 40.0, 180.0), "potatoes");
        assert!(text.contains("## Five-year restoration plan"));
        assert!(text.contains("review yields of Potatoes"));
    }

    #[test]
    fn blank_area_uses_generic_name() {
        let text = biodiversity("  ", &SoilReading::new(6.5, 30.0, 40.0, 180.0), "maize");
        assert!(text.contains("this area"));
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The five-year plan is the same for every soil, given the crop
    #[test]
    fn five_year_plan_depends_only_on_crop(
        ph in 3.0f64..9.0,
        n in 0.0f64..120.0,
        p in 0.0f64..90.0,
        k in 0.0f64..400.0,
    ) {
        let reference =
            biodiversity("Kakamega", &SoilReading::new(6.5, 30.0, 40.0, 180.0), "beans");
        let text = biodiversity("Kakamega", &SoilReading::new(ph, n, p, k), "beans");

        let tail = |s: &str| s[s.find("## Five-year restoration plan").unwrap()..].to_string();
        prop_assert_eq!(tail(&text), tail(&reference));
    }

    /// Every plan for a known crop carries all five core sections
    #[test]
    fn plans_are_complete(
        crop in prop::sample::select(vec!["maize", "beans", "peas", "potatoes"]),
        ph in 3.0f64..9.0,
        n in 0.0f64..120.0,
        p in 0.0f64..90.0,
        k in 0.0f64..400.0,
    ) {
        let text = plan(&SoilReading::new(ph, n, p, k), crop);
        for heading in ["## 1.", "## 2.", "## 3.", "## 4.", "## 5."] {
            prop_assert!(text.contains(heading));
        }
    }
}
