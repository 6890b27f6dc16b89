//! Rule-based reduction tips.
//!
//! Each chain is an ordered list of rules; the first rule that applies
//! produces the tip. Every chain ends in a fallback, so a tip is always
//! returned. Name matching is case-insensitive substring containment.

use serde::Serialize;

use crate::models::{ActivityCategory, ActivityDefinition, Route};

/// Savings (as % of the selected distance) above which a shorter route is
/// presented as a clear improvement rather than a marginal one.
const SIGNIFICANT_SAVINGS_PCT: f64 = 5.0;
/// Slack for the percentage comparison; decimal distances that save exactly
/// 5% can land a hair under 5.0 after division.
const SAVINGS_PCT_EPSILON: f64 = 1e-9;
const WALKING_DISTANCE_KM: f64 = 3.0;
const TRANSIT_DISTANCE_KM: f64 = 10.0;
/// Per-passenger bus emissions used to estimate transit savings (kg CO2/km)
const PUBLIC_TRANSIT_FACTOR: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tip {
    pub category: ActivityCategory,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_savings_kg: Option<f64>,
}

/// Inputs a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct TipContext<'a> {
    pub activity: &'a ActivityDefinition,
    pub selected_route: Option<&'a Route>,
    pub routes: &'a [Route],
}

impl TipContext<'_> {
    fn shortest_route(&self) -> Option<&Route> {
        self.routes.iter().min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }

    /// Shortest candidate and the km it saves, if strictly shorter than the selected route
    fn shorter_route(&self) -> Option<(&Route, f64)> {
        let selected = self.selected_route?;
        let shortest = self.shortest_route()?;
        let saved = selected.distance_km - shortest.distance_km;
        (saved > 0.0).then_some((shortest, saved))
    }

    fn savings_pct(&self, saved_km: f64) -> f64 {
        self.selected_route
            .map_or(0.0, |route| saved_km / route.distance_km * 100.0)
    }

    fn distance_km(&self) -> f64 {
        self.selected_route.map_or(0.0, |route| route.distance_km)
    }
}

pub struct RouteRule {
    pub name: &'static str,
    pub applies: fn(&TipContext) -> bool,
    pub build: fn(&TipContext) -> Tip,
}

/// Rules for a transport activity with a selected route, in priority order
pub const ROUTE_RULES: &[RouteRule] = &[
    RouteRule {
        name: "already-shortest",
        applies: |ctx| match (ctx.selected_route, ctx.shortest_route()) {
            (Some(selected), Some(shortest)) => selected.distance_km <= shortest.distance_km,
            _ => false,
        },
        build: |ctx| {
            let route = ctx.selected_route.map_or("this route", |r| r.name.as_str());
            transport_tip(
                "Efficient route",
                format!(
                    "You're already on the shortest route ({route}, {:.1} km). \
                     Combining errands into a single trip cuts emissions further.",
                    ctx.distance_km()
                ),
                None,
            )
        },
    },
    RouteRule {
        name: "significantly-shorter",
        applies: |ctx| {
            ctx.shorter_route()
                .is_some_and(|(_, saved)| is_significant(ctx.savings_pct(saved)))
        },
        build: |ctx| shorter_route_tip(ctx, "Shorter route available"),
    },
    RouteRule {
        name: "slightly-shorter",
        applies: |ctx| ctx.shorter_route().is_some(),
        build: |ctx| shorter_route_tip(ctx, "Slightly shorter route"),
    },
    RouteRule {
        name: "walkable",
        applies: |ctx| ctx.distance_km() < WALKING_DISTANCE_KM,
        build: |ctx| {
            transport_tip(
                "Walk or cycle",
                format!(
                    "This trip is only {:.1} km. Walking or cycling would make it emission-free \
                     and add some exercise to your day.",
                    ctx.distance_km()
                ),
                Some(ctx.distance_km() * ctx.activity.emission_factor),
            )
        },
    },
    RouteRule {
        name: "short-car-trip",
        applies: |ctx| {
            ctx.distance_km() < TRANSIT_DISTANCE_KM && contains_any(&ctx.activity.name, &["car"])
        },
        build: |ctx| {
            let saved = (ctx.activity.emission_factor - PUBLIC_TRANSIT_FACTOR).max(0.0) * ctx.distance_km();
            transport_tip(
                "Try public transit",
                format!(
                    "For a {:.1} km trip, taking the bus or train instead of driving would save \
                     about {saved:.2} kg CO2.",
                    ctx.distance_km()
                ),
                Some(saved),
            )
        },
    },
];

fn is_significant(savings_pct: f64) -> bool {
    savings_pct >= SIGNIFICANT_SAVINGS_PCT - SAVINGS_PCT_EPSILON
}

fn route_fallback(ctx: &TipContext) -> Tip {
    transport_tip(
        "Optimise your route",
        format!(
            "Plan {:.1} km trips to avoid traffic and idling; smooth driving at steady speeds \
             reduces fuel use by up to 20%.",
            ctx.distance_km()
        ),
        None,
    )
}

fn shorter_route_tip(ctx: &TipContext, title: &str) -> Tip {
    let Some((route, saved_km)) = ctx.shorter_route() else {
        return route_fallback(ctx);
    };
    let pct = ctx.savings_pct(saved_km);
    let saved_kg = saved_km * ctx.activity.emission_factor;
    transport_tip(
        title,
        format!(
            "Taking {} instead would save {saved_km:.1} km ({pct:.1}%) and about {saved_kg:.2} kg CO2.",
            route.name
        ),
        Some(saved_kg),
    )
}

fn transport_tip(title: &str, message: String, potential_savings_kg: Option<f64>) -> Tip {
    Tip {
        category: ActivityCategory::Transport,
        title: title.to_string(),
        message,
        potential_savings_kg,
    }
}

/// A tip chosen by keywords in the activity name
pub struct NameRule {
    pub keywords: &'static [&'static str],
    pub title: &'static str,
    pub message: &'static str,
    /// Fraction of the activity's emissions the advice could avoid
    pub reduction: Option<f64>,
}

const fn rule(
    keywords: &'static [&'static str],
    title: &'static str,
    message: &'static str,
    reduction: Option<f64>,
) -> NameRule {
    NameRule { keywords, title, message, reduction }
}

pub const TRANSPORT_RULES: &[NameRule] = &[
    rule(
        &["flight", "plane"],
        "Fly less",
        "For trips under 700 km the train is usually faster door to door and emits a fraction of the CO2.",
        Some(0.8),
    ),
    rule(
        &["electric"],
        "Charge clean",
        "Charge off-peak or from a renewable tariff to get the most out of your electric vehicle.",
        Some(0.3),
    ),
    rule(
        &["car"],
        "Share the ride",
        "Carpooling with one colleague halves the emissions of your commute.",
        Some(0.5),
    ),
    rule(
        &["motorcycle"],
        "Keep it tuned",
        "Regular maintenance and correct tyre pressure keep motorcycle fuel use down.",
        Some(0.1),
    ),
    rule(
        &["bus", "train"],
        "Great choice",
        "Public transport is one of the lowest-carbon ways to travel. Keep it up!",
        None,
    ),
    rule(
        &["bicycle", "bike", "walk"],
        "Zero emissions",
        "Active travel produces no emissions at all. Nice work!",
        None,
    ),
];

pub const FOOD_RULES: &[NameRule] = &[
    rule(
        &["beef"],
        "Swap some beef",
        "Beef has the highest footprint of any common food. Replacing it with beans or lentils a few times a week makes a big difference.",
        Some(0.9),
    ),
    rule(
        &["lamb"],
        "Choose lower-impact protein",
        "Lamb is among the most carbon-intensive meats; chicken or plant proteins emit far less.",
        Some(0.8),
    ),
    rule(
        &["cheese", "milk", "dairy"],
        "Try plant-based dairy",
        "Oat and soy alternatives have a much lower footprint than dairy.",
        Some(0.6),
    ),
    rule(
        &["pork", "chicken"],
        "Add meat-free days",
        "Going meat-free one or two days a week is an easy way to cut food emissions.",
        Some(0.3),
    ),
    rule(
        &["fish"],
        "Pick sustainable seafood",
        "Look for certified sustainable fish and avoid air-freighted seafood.",
        Some(0.2),
    ),
    rule(
        &["rice"],
        "Vary your grains",
        "Rice paddies release methane; mixing in other grains like barley or quinoa lowers the impact.",
        Some(0.3),
    ),
    rule(
        &["vegetable", "fruit"],
        "Buy local and seasonal",
        "Seasonal, locally grown produce avoids heated greenhouses and long transport.",
        Some(0.1),
    ),
];

pub const ELECTRICITY_RULES: &[NameRule] = &[
    rule(
        &["air conditioning"],
        "Adjust the thermostat",
        "Raising the AC setpoint by 1-2 degrees and using fans saves a surprising amount of energy.",
        Some(0.2),
    ),
    rule(
        &["heating"],
        "Turn the heat down",
        "Lowering the thermostat by 1 degree cuts heating energy by around 10%.",
        Some(0.1),
    ),
    rule(
        &["light"],
        "Switch to LEDs",
        "LED bulbs use up to 80% less electricity than incandescent ones.",
        Some(0.8),
    ),
    rule(
        &["computer", "television"],
        "Kill standby power",
        "Switch devices off at the wall instead of leaving them on standby.",
        Some(0.1),
    ),
];

fn generic_tip(category: ActivityCategory) -> (&'static str, &'static str) {
    match category {
        ActivityCategory::Transport => (
            "Travel smarter",
            "Combine errands, keep tyres inflated and choose public transport where you can.",
        ),
        ActivityCategory::Electricity => (
            "Save energy at home",
            "Unplug idle chargers, use efficient appliances and consider a renewable energy tariff.",
        ),
        ActivityCategory::Food => (
            "Eat more plants",
            "A diet richer in vegetables, grains and legumes is one of the biggest ways to cut your footprint.",
        ),
        ActivityCategory::Waste => (
            "Reduce and recycle",
            "Recycle paper, glass and metals, and compost food scraps to keep them out of landfill.",
        ),
        ActivityCategory::Water => (
            "Use water wisely",
            "Shorter showers and fixing leaks save both water and the energy used to heat and pump it.",
        ),
    }
}

fn name_rules(category: ActivityCategory) -> &'static [NameRule] {
    match category {
        ActivityCategory::Transport => TRANSPORT_RULES,
        ActivityCategory::Food => FOOD_RULES,
        ActivityCategory::Electricity => ELECTRICITY_RULES,
        ActivityCategory::Waste | ActivityCategory::Water => &[],
    }
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(k))
}

/// First name rule matching the activity, if any
pub fn matching_name_rule(activity: &ActivityDefinition) -> Option<&'static NameRule> {
    name_rules(activity.category)
        .iter()
        .find(|r| contains_any(&activity.name, r.keywords))
}

/// First route rule applying to `ctx`, if any
pub fn matching_route_rule(ctx: &TipContext) -> Option<&'static RouteRule> {
    ROUTE_RULES.iter().find(|r| (r.applies)(ctx))
}

/// Select exactly one tip for an activity.
///
/// Transport activities with a selected route go through the route chain;
/// everything else is matched on the activity name within its category.
pub fn select_tip(
    activity: &ActivityDefinition,
    quantity: f64,
    selected_route: Option<&Route>,
    all_routes: Option<&[Route]>,
) -> Tip {
    let ctx = TipContext {
        activity,
        selected_route,
        routes: all_routes.unwrap_or_default(),
    };

    if activity.category == ActivityCategory::Transport && selected_route.is_some() {
        return match matching_route_rule(&ctx) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, activity = %activity.id, "tips: route rule matched");
                (rule.build)(&ctx)
            }
            None => route_fallback(&ctx),
        };
    }

    match matching_name_rule(activity) {
        Some(rule) => Tip {
            category: activity.category,
            title: rule.title.to_string(),
            message: rule.message.to_string(),
            potential_savings_kg: rule
                .reduction
                .map(|fraction| quantity * activity.emission_factor * fraction),
        },
        None => {
            let (title, message) = generic_tip(activity.category);
            Tip {
                category: activity.category,
                title: title.to_string(),
                message: message.to_string(),
                potential_savings_kg: None,
            }
        }
    }
}
