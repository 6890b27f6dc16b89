//! Footprint calculator logic

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::models::{
    clamp_quantity, ActivityCategory, ActivityEmission, CategoryEmission, FootprintResult, Horizon,
    LoggedActivity,
};
use crate::rating::{classify, Rating};
use crate::store::QuantityStore;

/// Emissions (kg CO2/day) of a single logged activity.
///
/// Activities missing from the catalog contribute nothing.
fn emissions_of(catalog: &Catalog, activity: &LoggedActivity) -> f64 {
    catalog
        .get(&activity.activity_id)
        .map_or(0.0, |def| activity.quantity * def.emission_factor)
}

/// Compute daily, weekly, monthly and yearly totals for a set of logged activities
pub fn compute(catalog: &Catalog, activities: &[LoggedActivity]) -> FootprintResult {
    let daily_total: f64 = activities.iter().map(|a| emissions_of(catalog, a)).sum();
    FootprintResult::from_daily(daily_total)
}

/// Sum emissions per category, largest first.
///
/// Categories with nothing logged are left out. Equal sums keep the
/// category declaration order.
pub fn category_breakdown(catalog: &Catalog, activities: &[LoggedActivity]) -> Vec<CategoryEmission> {
    let mut sums = [0.0_f64; ActivityCategory::ALL.len()];
    let mut daily_total = 0.0;

    for activity in activities {
        if let Some(def) = catalog.get(&activity.activity_id) {
            let kg = activity.quantity * def.emission_factor;
            sums[def.category as usize] += kg;
            daily_total += kg;
        }
    }

    let mut breakdown: Vec<CategoryEmission> = ActivityCategory::ALL
        .into_iter()
        .zip(sums)
        .filter(|&(_, kg)| kg > 0.0)
        .map(|(category, kg)| CategoryEmission {
            category,
            emissions_kg: kg,
            share: kg / daily_total,
        })
        .collect();

    // sort_by is stable, so ties stay in declaration order
    breakdown.sort_by(|a, b| b.emissions_kg.total_cmp(&a.emissions_kg));
    breakdown
}

/// Per-activity emissions for every activity with a positive quantity.
///
/// Rows follow the order of `activities`; the tracker keeps those in catalog order.
pub fn activity_breakdown(catalog: &Catalog, activities: &[LoggedActivity]) -> Vec<ActivityEmission> {
    activities
        .iter()
        .filter(|a| a.quantity > 0.0)
        .filter_map(|a| {
            let def = catalog.get(&a.activity_id)?;
            Some(ActivityEmission {
                activity_id: def.id.clone(),
                name: def.name.clone(),
                category: def.category,
                quantity: a.quantity,
                unit: def.unit.clone(),
                emissions_kg: a.quantity * def.emission_factor,
            })
        })
        .collect()
}

/// Owns the logged quantities for every catalog activity and keeps them valid.
///
/// All mutations clamp quantities to be non-negative; updates for unknown ids
/// are ignored.
#[derive(Debug, Clone)]
pub struct FootprintTracker {
    catalog: Catalog,
    activities: Vec<LoggedActivity>,
}

impl FootprintTracker {
    pub fn new(catalog: Catalog) -> Self {
        let activities = catalog.iter().map(|def| LoggedActivity::new(def.id.clone(), 0.0)).collect();
        Self { catalog, activities }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn activities(&self) -> &[LoggedActivity] {
        &self.activities
    }

    pub fn quantity(&self, id: &str) -> Option<f64> {
        self.activities.iter().find(|a| a.activity_id == id).map(|a| a.quantity)
    }

    /// Set the quantity for `id`, clamped to zero. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: &str, new_quantity: f64) {
        match self.activities.iter_mut().find(|a| a.activity_id == id) {
            Some(activity) => {
                activity.quantity = clamp_quantity(new_quantity);
                debug!(id, quantity = activity.quantity, "tracker: quantity updated");
            }
            None => debug!(id, "tracker: update for unknown activity ignored"),
        }
    }

    /// Zero every quantity; entries stay in place.
    pub fn reset(&mut self) {
        for activity in &mut self.activities {
            activity.quantity = 0.0;
        }
        debug!("tracker: reset");
    }

    pub fn footprint(&self) -> FootprintResult {
        compute(&self.catalog, &self.activities)
    }

    pub fn category_breakdown(&self) -> Vec<CategoryEmission> {
        category_breakdown(&self.catalog, &self.activities)
    }

    pub fn activity_breakdown(&self) -> Vec<ActivityEmission> {
        activity_breakdown(&self.catalog, &self.activities)
    }

    pub fn rating(&self) -> Rating {
        classify(self.footprint().daily_total)
    }

    pub fn report(&self) -> Report {
        let footprint = self.footprint();
        Report {
            footprint,
            categories: self.category_breakdown(),
            activities: self.activity_breakdown(),
            rating: classify(footprint.daily_total),
        }
    }

    /// Replace current quantities with the ones held by `store`
    pub fn load_from<S: QuantityStore + ?Sized>(&mut self, store: &S) -> Result<(), StoreError> {
        self.reset();
        for (id, quantity) in store.load_quantities()? {
            if self.quantity(&id).is_none() {
                tracing::warn!(%id, "stored quantity for unknown activity ignored");
                continue;
            }
            self.update_quantity(&id, quantity);
        }
        Ok(())
    }

    pub fn save_to<S: QuantityStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.save_quantities(&self.activities)
    }
}

/// Everything the presentation layer shows about the current footprint
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub footprint: FootprintResult,
    pub categories: Vec<CategoryEmission>,
    pub activities: Vec<ActivityEmission>,
    pub rating: Rating,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Carbon Footprint ===")?;
        for horizon in Horizon::ALL {
            writeln!(f, "  {:<8} {:>10.2} kg CO2", horizon.label(), self.footprint.total(horizon))?;
        }
        writeln!(f)?;

        writeln!(f, "Rating: {:?}", self.rating.tier)?;
        writeln!(f, "  {}", self.rating.message)?;
        writeln!(f)?;

        if self.categories.is_empty() {
            writeln!(f, "No activities logged.")?;
            return Ok(());
        }

        writeln!(f, "By category:")?;
        for c in &self.categories {
            writeln!(f, "  {:<12} {:>8.2} kg ({:>5.1}%)", c.category, c.emissions_kg, c.share * 100.0)?;
        }
        writeln!(f)?;

        writeln!(f, "By activity:")?;
        for a in &self.activities {
            writeln!(
                f,
                "  {:<24} {:>8.2} {:<7} {:>8.2} kg",
                a.name, a.quantity, a.unit, a.emissions_kg
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::Tier;
    use crate::store::MemoryStore;

    const EPS: f64 = 1e-9;

    fn example_tracker() -> FootprintTracker {
        let mut tracker = FootprintTracker::new(Catalog::builtin());
        tracker.update_quantity("car-petrol", 10.0);
        tracker.update_quantity("beef", 0.5);
        tracker
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let result = compute(&Catalog::builtin(), &[]);
        assert_eq!(result, FootprintResult::default());
        assert!(category_breakdown(&Catalog::builtin(), &[]).is_empty());
    }

    #[test]
    fn test_car_and_beef_example() {
        let result = example_tracker().footprint();
        assert!((result.daily_total - 15.6).abs() < EPS);
        assert!((result.weekly_total - 109.2).abs() < EPS);
        assert_eq!(result.weekly_total, result.daily_total * 7.0);
        assert_eq!(example_tracker().rating().tier, Tier::Fair);
    }

    #[test]
    fn test_unknown_activity_contributes_nothing() {
        let activities = vec![LoggedActivity::new("teleporter", 100.0), LoggedActivity::new("bus", 10.0)];
        let result = compute(&Catalog::builtin(), &activities);
        assert!((result.daily_total - 1.0).abs() < EPS);
    }

    #[test]
    fn test_breakdown_sorted_descending_without_zero_categories() {
        let mut tracker = example_tracker();
        tracker.update_quantity("grid-electricity", 4.0);
        let breakdown = tracker.category_breakdown();

        let categories: Vec<_> = breakdown.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![ActivityCategory::Food, ActivityCategory::Transport, ActivityCategory::Electricity]
        );
        assert!((breakdown[0].emissions_kg - 13.5).abs() < EPS);
        let shares: f64 = breakdown.iter().map(|c| c.share).sum();
        assert!((shares - 1.0).abs() < EPS);
    }

    #[test]
    fn test_breakdown_ties_follow_declaration_order() {
        let mut tracker = FootprintTracker::new(Catalog::builtin());
        tracker.update_quantity("general-waste", 2.0); // 1.0 kg
        tracker.update_quantity("bus", 10.0); // 1.0 kg
        let categories: Vec<_> = tracker.category_breakdown().iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![ActivityCategory::Transport, ActivityCategory::Waste]);
    }

    #[test]
    fn test_zero_factor_activity_not_in_breakdown() {
        let mut tracker = FootprintTracker::new(Catalog::builtin());
        tracker.update_quantity("bicycle", 25.0);
        assert!(tracker.category_breakdown().is_empty());
        assert_eq!(tracker.activity_breakdown().len(), 1);
    }

    #[test]
    fn test_negative_update_stores_zero() {
        let mut tracker = example_tracker();
        tracker.update_quantity("beef", -4.0);
        assert_eq!(tracker.quantity("beef"), Some(0.0));
    }

    #[test]
    fn test_unknown_update_is_noop() {
        let mut tracker = example_tracker();
        let before = tracker.activities().to_vec();
        tracker.update_quantity("jetpack", 3.0);
        assert_eq!(tracker.activities(), before.as_slice());
    }

    #[test]
    fn test_reset_zeroes_but_keeps_entries() {
        let mut tracker = example_tracker();
        let count = tracker.activities().len();
        tracker.reset();
        assert_eq!(tracker.activities().len(), count);
        assert_eq!(tracker.footprint().daily_total, 0.0);
    }

    #[test]
    fn test_activity_breakdown_follows_catalog_order() {
        let mut tracker = FootprintTracker::new(Catalog::builtin());
        tracker.update_quantity("bottled-water", 1.0);
        tracker.update_quantity("beef", 1.0);
        tracker.update_quantity("bus", 1.0);
        let ids: Vec<_> = tracker.activity_breakdown().into_iter().map(|a| a.activity_id).collect();
        assert_eq!(ids, vec!["bus", "beef", "bottled-water"]);
    }

    #[test]
    fn test_activity_breakdown_lists_logged_only() {
        let breakdown = example_tracker().activity_breakdown();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].activity_id, "car-petrol");
        assert!((breakdown[0].emissions_kg - 2.1).abs() < EPS);
        assert_eq!(breakdown[1].unit, "kg");
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::default();
        example_tracker().save_to(&mut store).unwrap();

        let mut restored = FootprintTracker::new(Catalog::builtin());
        restored.load_from(&store).unwrap();
        assert_eq!(restored.quantity("beef"), Some(0.5));
        assert!((restored.footprint().daily_total - 15.6).abs() < EPS);
    }

    #[test]
    fn test_load_clamps_and_skips_unknown() {
        let mut store = MemoryStore::default();
        store.insert("beef", -2.0);
        store.insert("warp-drive", 5.0);
        store.insert("bus", 3.0);

        let mut tracker = example_tracker();
        tracker.load_from(&store).unwrap();
        assert_eq!(tracker.quantity("beef"), Some(0.0));
        assert_eq!(tracker.quantity("car-petrol"), Some(0.0));
        assert_eq!(tracker.quantity("bus"), Some(3.0));
    }

    #[test]
    fn test_report_json_fields() {
        let json = serde_json::to_value(example_tracker().report()).unwrap();
        assert_eq!(json["categories"][0]["category"], "food");
        assert_eq!(json["activities"][1]["activity_id"], "beef");
        assert_eq!(json["rating"]["tier"], "fair");
        assert!(json["footprint"]["weekly_total"].is_number());
    }

    #[test]
    fn test_report_display_mentions_rating() {
        let text = example_tracker().report().to_string();
        assert!(text.contains("Rating: Fair"));
        assert!(text.contains("Beef"));
    }
}
