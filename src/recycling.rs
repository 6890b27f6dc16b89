//! Recyclability guidance for labels produced by an object classifier

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Material {
    Plastic,
    Glass,
    Metal,
    Paper,
    Battery,
    Electronics,
    Organic,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecyclingGuidance {
    pub label: String,
    pub material: Material,
    pub recyclable: bool,
    pub instructions: &'static str,
}

struct MaterialRule {
    keywords: &'static [&'static str],
    material: Material,
    recyclable: bool,
    instructions: &'static str,
}

// First match wins; more specific keywords come before generic ones.
const RULES: &[MaterialRule] = &[
    MaterialRule {
        keywords: &["battery", "batteries"],
        material: Material::Battery,
        recyclable: true,
        instructions: "Do not put in household bins. Take to a battery collection point.",
    },
    MaterialRule {
        keywords: &["phone", "laptop", "computer", "keyboard", "remote", "electronic"],
        material: Material::Electronics,
        recyclable: true,
        instructions: "Take to an e-waste drop-off so metals can be recovered safely.",
    },
    MaterialRule {
        keywords: &["plastic bag", "wrapper", "styrofoam", "polystyrene"],
        material: Material::Plastic,
        recyclable: false,
        instructions: "Soft plastics and foam usually can't go in kerbside recycling. Check for store drop-off.",
    },
    MaterialRule {
        keywords: &["bottle", "plastic", "container", "jug"],
        material: Material::Plastic,
        recyclable: true,
        instructions: "Empty and rinse, then place in the recycling bin with the cap on.",
    },
    MaterialRule {
        keywords: &["glass", "jar", "wine"],
        material: Material::Glass,
        recyclable: true,
        instructions: "Rinse and recycle. Remove lids; broken window glass goes in general waste.",
    },
    MaterialRule {
        keywords: &["can", "aluminium", "aluminum", "tin", "foil"],
        material: Material::Metal,
        recyclable: true,
        instructions: "Rinse and recycle. Clean foil can be scrunched into a ball.",
    },
    MaterialRule {
        keywords: &["pizza box", "tissue", "napkin", "paper towel"],
        material: Material::Paper,
        recyclable: false,
        instructions: "Greasy or soiled paper can't be recycled. Compost it instead.",
    },
    MaterialRule {
        keywords: &["paper", "cardboard", "carton", "newspaper", "magazine", "envelope"],
        material: Material::Paper,
        recyclable: true,
        instructions: "Keep dry, flatten boxes and place in the paper recycling.",
    },
    MaterialRule {
        keywords: &["banana", "apple", "food", "peel", "fruit", "vegetable", "leaves"],
        material: Material::Organic,
        recyclable: true,
        instructions: "Compost it or use the food waste bin.",
    },
];

const UNKNOWN_INSTRUCTIONS: &str = "Not sure about this item. Check your local council's recycling guidance.";

/// Look up recyclability for a classifier label (case-insensitive substring match)
pub fn recyclability(label: &str) -> RecyclingGuidance {
    let lowered = label.to_lowercase();
    let rule = RULES
        .iter()
        .find(|r| r.keywords.iter().any(|k| lowered.contains(k)));

    match rule {
        Some(rule) => RecyclingGuidance {
            label: label.to_string(),
            material: rule.material,
            recyclable: rule.recyclable,
            instructions: rule.instructions,
        },
        None => RecyclingGuidance {
            label: label.to_string(),
            material: Material::Unknown,
            recyclable: false,
            instructions: UNKNOWN_INSTRUCTIONS,
        },
    }
}
