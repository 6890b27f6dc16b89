//! Carbon Footprint Calculator
//!
//! Command-line host for logging activities and reporting emissions.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use carbon_footprint::import;
use carbon_footprint::recycling;
use carbon_footprint::{select_tip, ActivityCategory, Catalog, FootprintTracker, Route, SqliteStore};

#[derive(Parser)]
#[command(name = "carbon-footprint")]
#[command(about = "Track personal carbon emissions from everyday activities")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "footprint.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// List available activities and their emission factors
    ListActivities {
        /// Only show one category (transport, electricity, food, waste, water)
        #[arg(short, long)]
        category: Option<ActivityCategory>,
    },

    /// Set the daily quantity for an activity (negative values count as zero)
    Log {
        /// Activity ID (e.g., "car-petrol", "beef")
        id: String,

        /// Quantity in the activity's unit
        #[arg(allow_negative_numbers = true)]
        quantity: f64,
    },

    /// Clear all logged quantities
    Reset,

    /// Show totals, category breakdown and rating
    Report {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Suggest a way to reduce emissions for an activity
    Tip {
        /// Activity ID
        id: String,

        /// Candidate route as NAME=KM (repeatable)
        #[arg(short, long = "route", value_parser = parse_route)]
        routes: Vec<Route>,

        /// Name of the chosen route (defaults to the first --route)
        #[arg(short, long, conflicts_with = "distance")]
        selected: Option<String>,

        /// Trip distance in km when no candidate routes are known
        #[arg(long, conflicts_with = "routes")]
        distance: Option<f64>,
    },

    /// Check whether a scanned object can be recycled
    Recycle {
        /// Object label (e.g., "plastic bottle")
        label: String,
    },

    /// Import custom activity definitions from *.activities files
    Import {
        /// Directory to search
        dir: PathBuf,

        /// Remove previously imported activities first
        #[arg(long)]
        clear: bool,
    },
}

fn parse_route(s: &str) -> Result<Route, String> {
    let (name, km) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=KM, got '{s}'"))?;
    let km: f64 = km.trim().parse().map_err(|e| format!("bad distance '{km}': {e}"))?;
    if km < 0.0 {
        return Err(format!("distance must not be negative, got {km}"));
    }
    Ok(Route::new(name.trim(), km))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Built-in catalog plus anything imported into the database
fn load_catalog(store: &SqliteStore) -> Result<Catalog> {
    let mut catalog = Catalog::builtin();
    catalog
        .extend(store.custom_activities()?)
        .context("imported activities conflict with the built-in catalog")?;
    Ok(catalog)
}

fn load_tracker(store: &SqliteStore) -> Result<FootprintTracker> {
    let mut tracker = FootprintTracker::new(load_catalog(store)?);
    tracker.load_from(store)?;
    Ok(tracker)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut store = SqliteStore::open(&cli.database)
        .with_context(|| format!("failed to open {}", cli.database.display()))?;

    match cli.command {
        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::ListActivities { category } => {
            let catalog = load_catalog(&store)?;
            println!("{:<20} {:<12} {:<24} {:>10} {}", "ID", "Category", "Activity", "kg CO2", "Unit");
            println!("{}", "-".repeat(76));
            for def in catalog.iter().filter(|d| category.is_none_or(|c| d.category == c)) {
                println!(
                    "{:<20} {:<12} {:<24} {:>10.4} per {}",
                    def.id, def.category, def.name, def.emission_factor, def.unit
                );
            }
        }

        Commands::Log { id, quantity } => {
            let mut tracker = load_tracker(&store)?;
            if tracker.quantity(&id).is_none() {
                println!("Activity '{}' not found. Run 'list-activities' to see valid IDs.", id);
                return Ok(());
            }
            tracker.update_quantity(&id, quantity);
            tracker.save_to(&mut store)?;
            info!(%id, quantity, "logged activity");

            let daily = tracker.footprint().daily_total;
            println!(
                "Logged {} = {}. Daily footprint is now {:.2} kg CO2.",
                id,
                tracker.quantity(&id).unwrap_or_default(),
                daily
            );
        }

        Commands::Reset => {
            let mut tracker = load_tracker(&store)?;
            tracker.reset();
            tracker.save_to(&mut store)?;
            println!("All logged activities cleared.");
        }

        Commands::Report { json } => {
            let report = load_tracker(&store)?.report();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }

        Commands::Tip {
            id,
            routes,
            selected,
            distance,
        } => {
            let tracker = load_tracker(&store)?;
            let Some(activity) = tracker.catalog().get(&id) else {
                bail!("activity '{}' not found", id);
            };
            let quantity = tracker.quantity(&id).unwrap_or_default();

            let trip = distance.map(|km| Route::new("Trip", km));
            let selected_route = match (&selected, &trip) {
                (_, Some(trip)) => Some(trip),
                (Some(name), None) => match routes.iter().find(|r| &r.name == name) {
                    Some(route) => Some(route),
                    None => bail!("selected route '{}' is not one of the --route values", name),
                },
                (None, None) => routes.first(),
            };
            let all_routes = (!routes.is_empty()).then_some(routes.as_slice());

            let tip = select_tip(activity, quantity, selected_route, all_routes);
            println!("[{}] {}", tip.category, tip.title);
            println!("  {}", tip.message);
            if let Some(kg) = tip.potential_savings_kg {
                println!("  Potential savings: {:.2} kg CO2", kg);
            }
        }

        Commands::Recycle { label } => {
            let guidance = recycling::recyclability(&label);
            let verdict = if guidance.recyclable { "recyclable" } else { "not recyclable" };
            println!("{}: {:?}, {}", guidance.label, guidance.material, verdict);
            println!("  {}", guidance.instructions);
        }

        Commands::Import { dir, clear } => {
            if clear {
                println!("Clearing imported activities...");
                store.clear_activities()?;
            }

            let stats = import::import_to_store(&store, &dir)?;
            println!("{}", stats);
        }
    }

    Ok(())
}
