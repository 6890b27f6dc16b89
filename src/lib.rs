//! Personal carbon footprint calculator.
//!
//! Log quantities against a catalog of activities, get daily to yearly
//! emission totals with a per-category breakdown, a qualitative rating and
//! reduction tips.

pub mod calculator;
pub mod catalog;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod rating;
pub mod recycling;
pub mod store;
pub mod tips;

pub use calculator::{compute, FootprintTracker, Report};
pub use catalog::Catalog;
pub use models::{
    ActivityCategory, ActivityDefinition, CategoryEmission, FootprintResult, Horizon, LoggedActivity, Route,
};
pub use rating::{classify, Rating, Tier};
pub use store::{MemoryStore, QuantityStore, SqliteStore};
pub use tips::{select_tip, Tip};
