//! Fertilizer and amendment plan
//!
//! Rule-based text plan. Application rates are fixed per tier rather than
//! computed from the size of the deficit.

use crate::models::{find_crop, CropProfile, NutrientBand, SoilReading, SuitabilityAnalysis};

/// Score at or above which the plan warns against over-fertilization
pub const OVER_FERTILIZATION_WARNING_SCORE: f64 = 0.7;

/// Severity of a single nutrient relative to the crop's bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Need {
    Critical,
    Moderate,
    Sufficient,
}

fn need(value: f64, band: &NutrientBand) -> Need {
    if value < band.min {
        Need::Critical
    } else if value < band.optimal {
        Need::Moderate
    } else {
        Need::Sufficient
    }
}

/// Generate the fertilizer plan for a crop.
///
/// Sections, in order: pH management, organic matter, nitrogen, phosphorus,
/// potassium, and (for well-scoring soils) an over-fertilization warning.
/// For a crop outside the table only the organic-matter guidance is given.
pub fn generate_fertilizer_plan(
    soil: &SoilReading,
    crop_id: &str,
    analysis: &SuitabilityAnalysis,
) -> String {
    let Some(crop) = find_crop(crop_id) else {
        let mut lines = vec![
            format!("# Fertilizer plan for {}", crop_id.trim()),
            String::new(),
            "No nutrient thresholds are available for this crop; a soil test interpreted by a local extension officer is recommended.".to_string(),
            String::new(),
        ];
        lines.extend(organic_matter_section(analysis.score));
        return lines.join("\n");
    };

    let mut lines = vec![
        format!("# Fertilizer plan for {}", crop.name),
        format!(
            "Soil: pH {:.1}, N {:.0} mg/kg, P {:.0} mg/kg, K {:.0} mg/kg (suitability {}, score {:.2})",
            soil.ph,
            soil.nitrogen,
            soil.phosphorus,
            soil.potassium,
            analysis.suitability,
            analysis.score
        ),
        String::new(),
    ];

    lines.extend(ph_section(soil, crop));
    lines.push(String::new());
    lines.extend(organic_matter_section(analysis.score));
    lines.push(String::new());
    lines.extend(nitrogen_section(soil, crop));
    lines.push(String::new());
    lines.extend(phosphorus_section(soil, crop));
    lines.push(String::new());
    lines.extend(potassium_section(soil, crop));

    if analysis.score >= OVER_FERTILIZATION_WARNING_SCORE {
        lines.push(String::new());
        lines.extend(over_fertilization_section(crop));
    }

    lines.join("\n")
}

fn ph_section(soil: &SoilReading, crop: &CropProfile) -> Vec<String> {
    let mut lines = vec!["## 1. pH management".to_string()];
    if soil.ph < crop.ph.min {
        lines.push(format!(
            "Soil is too acidic (pH {:.1}, {} needs {:.1}-{:.1}).",
            soil.ph, crop.name, crop.ph.min, crop.ph.max
        ));
        lines.push("- Apply agricultural lime (calcitic or dolomitic) at 1-2 tonnes/ha, broadcast and incorporate 2-4 weeks before planting.".to_string());
        lines.push("- Re-test pH after 6 months; repeat at 0.5-1 tonne/ha if still below target.".to_string());
    } else if soil.ph > crop.ph.max {
        lines.push(format!(
            "Soil is too alkaline (pH {:.1}, {} needs {:.1}-{:.1}).",
            soil.ph, crop.name, crop.ph.min, crop.ph.max
        ));
        lines.push("- Apply elemental sulphur at 200-500 kg/ha, or use acidifying fertilizers such as ammonium sulphate.".to_string());
        lines.push("- Avoid lime and wood ash on this field.".to_string());
    } else {
        lines.push(format!(
            "✅ pH {:.1} is within the {:.1}-{:.1} range for {}; no lime or sulphur needed.",
            soil.ph, crop.ph.min, crop.ph.max, crop.name
        ));
        lines.push("- Maintain with organic matter and re-test every 2-3 seasons.".to_string());
    }
    lines
}

fn organic_matter_section(score: f64) -> Vec<String> {
    let mut lines = vec!["## 2. Organic matter".to_string()];
    if score < 0.6 {
        lines.push("Heavy soil rebuilding required:".to_string());
        lines.push("- Apply 10-15 tonnes/ha of well-rotted farmyard manure before planting.".to_string());
        lines.push("- Add 5-8 tonnes/ha of compost and retain all crop residues.".to_string());
    } else if score < 0.8 {
        lines.push("Moderate organic matter top-up:".to_string());
        lines.push("- Apply 5-10 tonnes/ha of farmyard manure or compost each season.".to_string());
    } else {
        lines.push("Maintenance application:".to_string());
        lines.push("- Apply 2-5 tonnes/ha of compost or manure to sustain soil structure.".to_string());
    }
    lines
}

fn nitrogen_section(soil: &SoilReading, crop: &CropProfile) -> Vec<String> {
    let mut lines = vec!["## 3. Nitrogen (N)".to_string()];
    match need(soil.nitrogen, &crop.nitrogen) {
        Need::Critical => {
            lines.push(format!(
                "⚠️ CRITICAL NITROGEN DEFICIENCY: {:.0} mg/kg against a minimum of {:.0} mg/kg.",
                soil.nitrogen, crop.nitrogen.min
            ));
            if crop.nitrogen_fixing {
                lines.push("- Inoculate seed with Rhizobium and apply a starter dose of 20-30 kg/ha N (e.g. 50 kg/ha DAP) at planting.".to_string());
            } else {
                lines.push("- Apply 100-150 kg/ha of a high-nitrogen blend (e.g. YaraMila Power or NPK 23:23:0) at planting.".to_string());
                lines.push("- Top-dress with 100-150 kg/ha CAN or 50-100 kg/ha urea at 4-6 weeks after emergence.".to_string());
            }
        }
        Need::Moderate => {
            lines.push(format!(
                "Nitrogen is below optimal ({:.0} mg/kg, optimal {:.0} mg/kg).",
                soil.nitrogen, crop.nitrogen.optimal
            ));
            if crop.nitrogen_fixing {
                lines.push("- Rhizobium inoculation is usually sufficient; at most 10-20 kg/ha N as a starter.".to_string());
            } else {
                lines.push("- Top-dress with 50-75 kg/ha CAN at 4-6 weeks after emergence.".to_string());
            }
        }
        Need::Sufficient => {
            lines.push(format!(
                "✅ Nitrogen is sufficient ({:.0} mg/kg). Reduce nitrogen applications to avoid excessive leaf growth and leaching.",
                soil.nitrogen
            ));
            lines.push("- Skip top-dressing unless leaves turn pale; never exceed 25 kg/ha N this season.".to_string());
        }
    }
    lines
}

fn phosphorus_section(soil: &SoilReading, crop: &CropProfile) -> Vec<String> {
    let mut lines = vec!["## 4. Phosphorus (P)".to_string()];
    match need(soil.phosphorus, &crop.phosphorus) {
        Need::Critical => {
            lines.push(format!(
                "⚠️ CRITICAL PHOSPHORUS DEFICIENCY: {:.0} mg/kg against a minimum of {:.0} mg/kg.",
                soil.phosphorus, crop.phosphorus.min
            ));
            lines.push("- Apply 100-125 kg/ha DAP or TSP in the planting furrow, mixed with soil.".to_string());
            lines.push("- Consider 200-300 kg/ha rock phosphate on acidic soils for longer-term build-up.".to_string());
        }
        Need::Moderate => {
            lines.push(format!(
                "Phosphorus is below optimal ({:.0} mg/kg, optimal {:.0} mg/kg).",
                soil.phosphorus, crop.phosphorus.optimal
            ));
            lines.push("- Apply 50-75 kg/ha DAP at planting.".to_string());
        }
        Need::Sufficient => {
            lines.push(format!(
                "✅ Phosphorus is sufficient ({:.0} mg/kg). Reduce phosphate fertilizer to limit run-off and zinc lock-up.",
                soil.phosphorus
            ));
            lines.push("- A maintenance dose of at most 25 kg/ha DAP is enough.".to_string());
        }
    }
    lines
}

fn potassium_section(soil: &SoilReading, crop: &CropProfile) -> Vec<String> {
    let mut lines = vec!["## 5. Potassium (K)".to_string()];
    match need(soil.potassium, &crop.potassium) {
        Need::Critical => {
            lines.push(format!(
                "⚠️ CRITICAL POTASSIUM DEFICIENCY: {:.0} mg/kg against a minimum of {:.0} mg/kg.",
                soil.potassium, crop.potassium.min
            ));
            lines.push("- Apply 100-150 kg/ha Muriate of Potash (KCl), split between planting and 4 weeks later.".to_string());
            lines.push("- Return crop residues and wood ash where pH allows.".to_string());
        }
        Need::Moderate => {
            lines.push(format!(
                "Potassium is below optimal ({:.0} mg/kg, optimal {:.0} mg/kg).",
                soil.potassium, crop.potassium.optimal
            ));
            lines.push("- Apply 50-75 kg/ha Muriate of Potash at planting.".to_string());
        }
        Need::Sufficient => {
            lines.push(format!(
                "✅ Potassium is sufficient ({:.0} mg/kg). Reduce potash to avoid magnesium and calcium imbalance.",
                soil.potassium
            ));
            lines.push("- No potash needed this season.".to_string());
        }
    }
    lines
}

fn over_fertilization_section(crop: &CropProfile) -> Vec<String> {
    vec![
        "## 6. Avoid over-fertilization".to_string(),
        format!(
            "Soil conditions are already good for {}. Extra fertilizer will not raise yields and can:",
            crop.name
        ),
        "- leach nitrate into groundwater and streams".to_string(),
        "- burn seedlings and encourage weeds".to_string(),
        "- waste money better spent on seed and pest control".to_string(),
        "Re-test the soil every 2 seasons before changing rates.".to_string(),
    ]
}
