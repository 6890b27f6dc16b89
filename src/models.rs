//! Data models for activities, emissions and routes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Broad grouping of loggable activities.
///
/// Declaration order is the canonical order used for listings and for
/// breaking ties between categories with equal emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Transport,
    Electricity,
    Food,
    Waste,
    Water,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 5] = [
        ActivityCategory::Transport,
        ActivityCategory::Electricity,
        ActivityCategory::Food,
        ActivityCategory::Waste,
        ActivityCategory::Water,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityCategory::Transport => "transport",
            ActivityCategory::Electricity => "electricity",
            ActivityCategory::Food => "food",
            ActivityCategory::Waste => "waste",
            ActivityCategory::Water => "water",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ActivityCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownCategory(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub id: String,
    pub category: ActivityCategory,
    pub name: String,
    pub emission_factor: f64, // kg CO2 per unit
    pub unit: String,
}

/// A quantity logged against a catalog activity. Zero means "not logged".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedActivity {
    pub activity_id: String,
    pub quantity: f64,
}

impl LoggedActivity {
    pub fn new(activity_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            activity_id: activity_id.into(),
            quantity: clamp_quantity(quantity),
        }
    }
}

/// Coerce a user-supplied quantity to a valid one: negatives and NaN become 0.
pub fn clamp_quantity(quantity: f64) -> f64 {
    if quantity > 0.0 { quantity } else { 0.0 }
}

/// Time window a daily figure is scaled to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [Horizon::Daily, Horizon::Weekly, Horizon::Monthly, Horizon::Yearly];

    pub fn days(self) -> f64 {
        match self {
            Horizon::Daily => 1.0,
            Horizon::Weekly => 7.0,
            Horizon::Monthly => 30.0,
            Horizon::Yearly => 365.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Horizon::Daily => "Daily",
            Horizon::Weekly => "Weekly",
            Horizon::Monthly => "Monthly",
            Horizon::Yearly => "Yearly",
        }
    }
}

/// Total emissions (kg CO2) over each horizon.
///
/// Only `daily_total` is summed; the others are exact multiples of it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FootprintResult {
    pub daily_total: f64,
    pub weekly_total: f64,
    pub monthly_total: f64,
    pub yearly_total: f64,
}

impl FootprintResult {
    pub fn from_daily(daily_total: f64) -> Self {
        Self {
            daily_total,
            weekly_total: daily_total * Horizon::Weekly.days(),
            monthly_total: daily_total * Horizon::Monthly.days(),
            yearly_total: daily_total * Horizon::Yearly.days(),
        }
    }

    pub fn total(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::Daily => self.daily_total,
            Horizon::Weekly => self.weekly_total,
            Horizon::Monthly => self.monthly_total,
            Horizon::Yearly => self.yearly_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEmission {
    pub category: ActivityCategory,
    pub emissions_kg: f64,
    pub share: f64, // fraction of the daily total, 0..=1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEmission {
    pub activity_id: String,
    pub name: String,
    pub category: ActivityCategory,
    pub quantity: f64,
    pub unit: String,
    pub emissions_kg: f64,
}

/// A candidate trip for a transport activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub distance_km: f64,
}

impl Route {
    pub fn new(name: impl Into<String>, distance_km: f64) -> Self {
        Self {
            name: name.into(),
            distance_km: clamp_quantity(distance_km),
        }
    }
}
