//! Management CLI for the hike planner drive-time services.
//!
//! The web application reads the matrix; this binary is what writes it.
//! Subcommands map to the operator tasks: reconcile the matrix, sync it
//! against the distance API, invalidate a trailhead after a coordinate
//! edit, seed rows, and check status.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use hike_server::distance::{DistanceClient, DistanceConfig};
use hike_server::domain::{LatLon, TrailheadId};
use hike_server::forecast::{ForecastClient, ForecastConfig, group_by_day};
use hike_server::logging::init_logging;
use hike_server::matrix::{
    MatrixStore, OriginKind, SqliteMatrixStore, SyncEngine, SyncOptions, ensure_entries_exist,
};

/// Environment variable holding the distance-matrix API key.
const DISTANCE_API_KEY_VAR: &str = "HIKEPLANNER_GOOGLE_DISTANCE_MATRIX_API_KEY";

#[derive(Debug, Parser)]
#[command(
    name = "hike-server",
    about = "Drive-time matrix management for the hike planner"
)]
struct Cli {
    /// Path to the matrix database
    #[arg(long, default_value = "hikeplanner.db")]
    db: PathBuf,

    /// Log debug detail
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create any missing (trailhead, major city) matrix entries
    Fill,

    /// Query the distance API and update matrix entries
    Sync {
        /// Only query entries that have never been synced (default)
        #[arg(long, conflicts_with_all = ["error_only", "all"])]
        new_only: bool,

        /// Only retry entries whose last sync failed
        #[arg(long, conflicts_with = "all")]
        error_only: bool,

        /// Query both new and failed entries
        #[arg(long)]
        all: bool,

        /// Batch origin granularity
        #[arg(long, value_enum, default_value = "majorcity")]
        origin: OriginArg,
    },

    /// Reset a trailhead's entries after its coordinates change
    Invalidate {
        /// Trailhead id whose entries should be recomputed
        #[arg(long)]
        trailhead: i64,
    },

    /// Add a trailhead row
    AddTrailhead {
        name: String,
        latitude: f64,
        longitude: f64,
    },

    /// Add a major-city row
    AddCity {
        name: String,
        latitude: f64,
        longitude: f64,
    },

    /// Show entry counts per status
    Status,

    /// Print the NOAA forecast for a trailhead, grouped by day
    Forecast {
        /// Trailhead id to fetch the forecast for
        #[arg(long)]
        trailhead: i64,
    },
}

/// Batch origin granularity argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OriginArg {
    /// One batch per major city, trailheads as destinations
    Majorcity,
    /// One batch per trailhead, major cities as destinations
    Trailhead,
}

impl From<OriginArg> for OriginKind {
    fn from(arg: OriginArg) -> Self {
        match arg {
            OriginArg::Majorcity => OriginKind::MajorCity,
            OriginArg::Trailhead => OriginKind::Trailhead,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut store = SqliteMatrixStore::open(&cli.db)?;

    match cli.command {
        Command::Fill => {
            let report = ensure_entries_exist(&mut store)?;
            for line in &report.trace {
                println!("{line}");
            }
        }

        Command::Sync {
            new_only,
            error_only,
            all,
            origin,
        } => {
            let api_key = std::env::var(DISTANCE_API_KEY_VAR).unwrap_or_else(|_| {
                eprintln!("Warning: {DISTANCE_API_KEY_VAR} not set. API calls will fail.");
                String::new()
            });
            let client = DistanceClient::new(DistanceConfig::new(api_key))?;

            // --new-only is the default; the flag exists so operators
            // can say it explicitly.
            let (run_new, run_errors) = match (new_only, error_only, all) {
                (_, true, _) => (false, true),
                (_, _, true) => (true, true),
                _ => (true, false),
            };
            let options = SyncOptions {
                run_new,
                run_errors,
                origin: origin.into(),
            };

            let report = SyncEngine::new(&mut store, &client)
                .synchronize(&options)
                .await?;
            for line in &report.trace {
                println!("{line}");
            }
        }

        Command::Invalidate { trailhead } => {
            let reset = store.bulk_invalidate(TrailheadId(trailhead))?;
            println!("Entries reset for trailhead {trailhead}: {reset}");
        }

        Command::AddTrailhead {
            name,
            latitude,
            longitude,
        } => {
            let coord = LatLon::new(latitude, longitude)?;
            let id = store.insert_trailhead(&name, coord)?;
            println!("Added trailhead {id}: {name} ({coord})");
        }

        Command::AddCity {
            name,
            latitude,
            longitude,
        } => {
            let coord = LatLon::new(latitude, longitude)?;
            let id = store.insert_city(&name, coord)?;
            println!("Added major city {id}: {name} ({coord})");
        }

        Command::Status => {
            for (status, count) in store.status_counts()? {
                println!("{status}: {count}");
            }
            println!("Total entries: {}", store.entry_count()?);
        }

        Command::Forecast { trailhead } => {
            let trailheads = store.trailheads()?;
            let target = trailheads
                .iter()
                .find(|t| t.id == TrailheadId(trailhead))
                .ok_or_else(|| format!("no trailhead with id {trailhead}"))?;

            let client = ForecastClient::new(ForecastConfig::new())?;
            let response = client.point_forecast(&target.coord).await?;
            let days = group_by_day(&response.properties.periods)?;

            println!("Forecast for {}:", target.name);
            for day in &days {
                println!("{} ({}/{})", day.label, day.month, day.day);
                for period in &day.periods {
                    println!(
                        "  {}: {}{}, {}",
                        period.name, period.temperature, period.temperature_unit,
                        period.short_forecast
                    );
                }
            }
        }
    }

    Ok(())
}
