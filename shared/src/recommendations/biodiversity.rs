//! Land restoration and biodiversity advisory

use crate::models::{find_crop, SoilReading, SuitabilityAnalysis};

/// Generate the biodiversity advisory for an area.
///
/// The action set is chosen by the analysis score (<0.5 intensive, <0.7
/// moderate, otherwise maintenance). Legumes get rotation guidance, other
/// crops get intercropping guidance. The five-year plan only varies by crop
/// name.
pub fn generate_biodiversity_advice(
    area_name: &str,
    soil: &SoilReading,
    crop_id: &str,
    analysis: &SuitabilityAnalysis,
) -> String {
    let crop = find_crop(crop_id);
    let crop_name = crop.map(|c| c.name.to_string()).unwrap_or_else(|| crop_id.trim().to_string());
    let area = if area_name.trim().is_empty() {
        "this area"
    } else {
        area_name.trim()
    };

    let mut lines = vec![
        format!("# Biodiversity and land restoration plan: {}", area),
        format!(
            "Current soil: pH {:.1}, N {:.0} mg/kg, P {:.0} mg/kg, K {:.0} mg/kg; suitability for {} is {} ({:.2}).",
            soil.ph,
            soil.nitrogen,
            soil.phosphorus,
            soil.potassium,
            crop_name,
            analysis.suitability,
            analysis.score
        ),
        String::new(),
    ];

    if analysis.score < 0.5 {
        lines.push("## Intensive restoration needed".to_string());
        lines.push(format!("Soils around {} are degraded. Priority actions:", area));
        lines.push("- Plant nitrogen-fixing trees (Calliandra, Sesbania, Gliricidia) along field boundaries and contours.".to_string());
        lines.push("- Establish a cover crop (mucuna or lablab) in the off-season; do not leave soil bare.".to_string());
        lines.push("- Build terraces or grass strips (Napier, vetiver) on slopes to stop erosion.".to_string());
        lines.push("- Stop burning residues; mulch them back into the field.".to_string());
    } else if analysis.score < 0.7 {
        lines.push("## Moderate restoration".to_string());
        lines.push(format!(
            "Soils around {} are fair but losing fertility. Recommended actions:",
            area
        ));
        lines.push("- Add agroforestry trees (Grevillea, fruit trees) at 50-100 trees/ha.".to_string());
        lines.push("- Rotate cereals with legumes at least every other season.".to_string());
        lines.push("- Keep a mulch layer and a flowering field margin for pollinators.".to_string());
    } else {
        lines.push("## Maintain biodiversity".to_string());
        lines.push(format!("Soils around {} are in good condition. Keep it that way:", area));
        lines.push("- Maintain hedgerows and field margins as habitat for pollinators and natural enemies.".to_string());
        lines.push("- Continue crop rotation and minimal tillage.".to_string());
        lines.push("- Monitor soil every 2-3 seasons.".to_string());
    }
    lines.push(String::new());

    match crop {
        Some(c) if c.nitrogen_fixing => {
            lines.push("## Crop rotation".to_string());
            lines.push(format!(
                "{} fix nitrogen. Follow them with a heavy feeder such as maize or potatoes next season to use the residual nitrogen, then return to a legume.",
                c.name
            ));
            lines.push(format!(
                "Suggested sequence: {} → maize → potatoes → {}.",
                c.name, c.name
            ));
        }
        _ => {
            lines.push("## Intercropping with legumes".to_string());
            lines.push(format!(
                "Intercrop {} with beans, cowpeas or groundnuts (e.g. one legume row between every two crop rows) to add nitrogen and ground cover.",
                crop_name
            ));
            lines.push("Push-pull with desmodium between rows also suppresses striga and stemborer.".to_string());
        }
    }
    lines.push(String::new());

    lines.extend(five_year_plan(&crop_name));
    lines.join("\n")
}

fn five_year_plan(crop_name: &str) -> Vec<String> {
    vec![
        "## Five-year restoration plan".to_string(),
        format!(
            "- Year 1: soil testing, liming where needed, and cover crops alongside {}.",
            crop_name
        ),
        "- Year 2: establish boundary trees and contour grass strips; start composting.".to_string(),
        format!(
            "- Year 3: introduce legume rotation or intercropping with {}; reduce synthetic inputs.",
            crop_name
        ),
        "- Year 4: expand agroforestry and pollinator habitat; re-test soil.".to_string(),
        format!(
            "- Year 5: review yields of {} and soil trends; adjust the plan for the next cycle.",
            crop_name
        ),
    ]
}
