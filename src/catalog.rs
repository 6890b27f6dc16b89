//! Activity catalog: the fixed table of loggable activities and their
//! emission factors, optionally extended with imported definitions.

use tracing::debug;

use crate::error::CatalogError;
use crate::models::{ActivityCategory, ActivityDefinition};

use ActivityCategory::{Electricity, Food, Transport, Waste, Water};

// (id, category, name, kg CO2 per unit, unit)
const DEFAULT_ACTIVITIES: &[(&str, ActivityCategory, &str, f64, &str)] = &[
    ("car-petrol", Transport, "Car (Petrol)", 0.21, "km"),
    ("car-diesel", Transport, "Car (Diesel)", 0.17, "km"),
    ("car-electric", Transport, "Car (Electric)", 0.05, "km"),
    ("motorcycle", Transport, "Motorcycle", 0.11, "km"),
    ("bus", Transport, "Bus", 0.10, "km"),
    ("train", Transport, "Train", 0.04, "km"),
    ("flight-short", Transport, "Flight (Short Haul)", 0.25, "km"),
    ("flight-long", Transport, "Flight (Long Haul)", 0.15, "km"),
    ("bicycle", Transport, "Bicycle", 0.0, "km"),
    ("grid-electricity", Electricity, "Grid Electricity", 0.5, "kWh"),
    ("air-conditioning", Electricity, "Air Conditioning", 1.5, "hours"),
    ("electric-heating", Electricity, "Electric Heating", 2.0, "hours"),
    ("lighting", Electricity, "Lighting", 0.05, "hours"),
    ("computer", Electricity, "Computer Usage", 0.1, "hours"),
    ("television", Electricity, "Television", 0.08, "hours"),
    ("beef", Food, "Beef", 27.0, "kg"),
    ("lamb", Food, "Lamb", 39.2, "kg"),
    ("pork", Food, "Pork", 12.1, "kg"),
    ("chicken", Food, "Chicken", 6.9, "kg"),
    ("fish", Food, "Fish", 6.1, "kg"),
    ("cheese", Food, "Cheese", 13.5, "kg"),
    ("milk", Food, "Milk", 1.9, "liters"),
    ("rice", Food, "Rice", 2.7, "kg"),
    ("vegetables", Food, "Vegetables", 2.0, "kg"),
    ("general-waste", Waste, "General Waste", 0.5, "kg"),
    ("recycled-waste", Waste, "Recycled Waste", 0.1, "kg"),
    ("food-waste", Waste, "Food Waste", 2.5, "kg"),
    ("tap-water", Water, "Tap Water", 0.0003, "liters"),
    ("hot-water", Water, "Hot Water", 0.006, "liters"),
    ("bottled-water", Water, "Bottled Water", 0.16, "liters"),
];

/// Ordered, read-only set of activity definitions
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<ActivityDefinition>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in activity table
    pub fn builtin() -> Self {
        let definitions = DEFAULT_ACTIVITIES
            .iter()
            .map(|&(id, category, name, factor, unit)| ActivityDefinition {
                id: id.to_string(),
                category,
                name: name.to_string(),
                emission_factor: factor,
                unit: unit.to_string(),
            })
            .collect();
        Self { definitions }
    }

    pub fn empty() -> Self {
        Self { definitions: Vec::new() }
    }

    /// Add a definition, rejecting duplicate ids and negative or non-finite factors.
    pub fn insert(&mut self, definition: ActivityDefinition) -> Result<(), CatalogError> {
        validate(&definition)?;
        if self.get(&definition.id).is_some() {
            return Err(CatalogError::DuplicateId(definition.id));
        }
        debug!(id = %definition.id, category = %definition.category, "catalog: added activity");
        self.definitions.push(definition);
        Ok(())
    }

    pub fn extend<I>(&mut self, definitions: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = ActivityDefinition>,
    {
        for definition in definitions {
            self.insert(definition)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ActivityDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.definitions.iter()
    }

    pub fn by_category(&self, category: ActivityCategory) -> impl Iterator<Item = &ActivityDefinition> {
        self.definitions.iter().filter(move |d| d.category == category)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

pub fn validate(definition: &ActivityDefinition) -> Result<(), CatalogError> {
    if !definition.emission_factor.is_finite() || definition.emission_factor < 0.0 {
        return Err(CatalogError::InvalidFactor {
            id: definition.id.clone(),
            factor: definition.emission_factor,
        });
    }
    Ok(())
}
