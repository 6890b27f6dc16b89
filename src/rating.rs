//! Qualitative rating of a daily footprint

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub tier: Tier,
    pub message: &'static str,
}

// Lower bounds (kg CO2/day), checked from the top. Buckets are half-open.
const THRESHOLDS: [(f64, Tier); 4] = [
    (30.0, Tier::Critical),
    (20.0, Tier::Poor),
    (10.0, Tier::Fair),
    (5.0, Tier::Good),
];

/// Classify a daily total into a tier.
///
/// Every input maps to exactly one tier; anything under 5 kg (including
/// negative or NaN values, which the calculator never produces) is Excellent.
pub fn classify(daily_total: f64) -> Rating {
    let tier = THRESHOLDS
        .iter()
        .find(|(lower, _)| daily_total >= *lower)
        .map_or(Tier::Excellent, |&(_, tier)| tier);

    Rating {
        tier,
        message: tier.message(),
    }
}

impl Tier {
    pub fn message(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent! Your carbon footprint is well below average. Keep it up!",
            Tier::Good => "Good job! Your footprint is below average, with room for small improvements.",
            Tier::Fair => "Fair. Your footprint is around average; try the tips to bring it down.",
            Tier::Poor => "Your footprint is above average. Consider reducing car trips and meat consumption.",
            Tier::Critical => "Your footprint is very high. Significant changes are needed to reduce your impact.",
        }
    }
}
