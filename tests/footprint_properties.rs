use carbon_footprint::models::clamp_quantity;
use carbon_footprint::{classify, compute, Catalog, FootprintTracker, LoggedActivity, Tier};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn quantities() -> impl Strategy<Value = Vec<f64>> {
    let len = Catalog::builtin().len();
    prop::collection::vec(prop_oneof![Just(0.0), 0.0_f64..500.0], len)
}

fn tracker_with(quantities: &[f64]) -> FootprintTracker {
    let mut tracker = FootprintTracker::new(Catalog::builtin());
    let ids: Vec<String> = tracker.catalog().iter().map(|d| d.id.clone()).collect();
    for (id, q) in ids.iter().zip(quantities) {
        tracker.update_quantity(id, *q);
    }
    tracker
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn daily_total_is_sum_of_quantity_times_factor(qs in quantities()) {
        let tracker = tracker_with(&qs);
        let expected: f64 = tracker
            .catalog()
            .iter()
            .zip(&qs)
            .map(|(def, q)| q * def.emission_factor)
            .sum();
        let daily = tracker.footprint().daily_total;
        prop_assert!(daily >= 0.0);
        prop_assert!((daily - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    #[test]
    fn horizons_are_exact_multiples(qs in quantities()) {
        let result = tracker_with(&qs).footprint();
        prop_assert_eq!(result.weekly_total, result.daily_total * 7.0);
        prop_assert_eq!(result.monthly_total, result.daily_total * 30.0);
        prop_assert_eq!(result.yearly_total, result.daily_total * 365.0);
    }

    #[test]
    fn negative_updates_store_zero(q in -1_000.0_f64..0.0) {
        let mut tracker = FootprintTracker::new(Catalog::builtin());
        tracker.update_quantity("beef", q);
        prop_assert_eq!(tracker.quantity("beef"), Some(0.0));
        prop_assert_eq!(clamp_quantity(q), 0.0);
    }

    #[test]
    fn reset_zeroes_the_footprint(qs in quantities()) {
        let mut tracker = tracker_with(&qs);
        tracker.reset();
        prop_assert_eq!(tracker.footprint().daily_total, 0.0);
        prop_assert!(tracker.category_breakdown().is_empty());
    }

    #[test]
    fn breakdown_has_no_zero_categories_and_is_sorted(qs in quantities()) {
        let breakdown = tracker_with(&qs).category_breakdown();
        prop_assert!(breakdown.iter().all(|c| c.emissions_kg > 0.0));
        prop_assert!(breakdown.windows(2).all(|w| w[0].emissions_kg >= w[1].emissions_kg));
    }

    #[test]
    fn rating_is_monotonic(a in 0.0_f64..100.0, b in 0.0_f64..100.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(low).tier <= classify(high).tier);
    }
}

#[test]
fn car_and_beef_reference_example() {
    let catalog = Catalog::builtin();
    let activities = vec![LoggedActivity::new("car-petrol", 10.0), LoggedActivity::new("beef", 0.5)];
    let result = compute(&catalog, &activities);
    assert!((result.daily_total - 15.6).abs() < 1e-9);
    assert!((result.weekly_total - 109.2).abs() < 1e-9);
    assert_eq!(classify(result.daily_total).tier, Tier::Fair);
}

#[test]
fn rating_reference_boundaries() {
    assert_eq!(classify(5.0).tier, Tier::Good);
    assert_eq!(classify(29.999).tier, Tier::Poor);
    assert_eq!(classify(30.0).tier, Tier::Critical);
}
