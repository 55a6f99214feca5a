//! tabimap: classify geotagged travel photos.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tabimap_classify::{ClassifierConfig, Config};
use tabimap_cli::output::Status;
use tabimap_telemetry::TelemetryConfig;

mod commands;
mod data;

/// Match photos to the places and trips they were taken at
#[derive(Parser)]
#[command(name = "tabimap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .tabimap.toml, tabimap.toml or .config/tabimap.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the EXIF location and capture time of a photo
    Exif {
        /// Path to image file
        path: PathBuf,
    },

    /// Find the place closest to a coordinate
    Nearest {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// JSON file with places
        #[arg(short, long)]
        places: PathBuf,
        /// Search radius in meters (defaults to the configured place radius)
        #[arg(short, long, allow_hyphen_values = true)]
        radius: Option<f64>,
    },

    /// Classify every photo in a directory
    Classify {
        /// Directory to scan
        path: PathBuf,
        /// JSON file with places
        #[arg(short, long)]
        places: PathBuf,
        /// JSON file with trips, used for trip suggestions
        #[arg(short, long)]
        trips: Option<PathBuf>,
        /// Only match against the places of this trip
        #[arg(long, requires = "trips")]
        trip: Option<String>,
    },

    /// List places by distance from a coordinate
    Rank {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// JSON file with places
        #[arg(short, long)]
        places: PathBuf,
        /// Maximum number of places to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Suggest trips for a capture time
    Trips {
        /// Capture time, e.g. 2025-04-03T12:00:00 or 2025:04:03 12:00:00
        #[arg(long)]
        taken_at: String,
        /// JSON file with trips
        #[arg(short, long)]
        trips: PathBuf,
        /// Days around a trip still suggested (defaults to the configured window)
        #[arg(short, long)]
        window: Option<u32>,
    },
}

/// Settings shared by every command
pub struct Context {
    pub config: ClassifierConfig,
    pub json: bool,
    pub verbose: bool,
}

fn init_logging(config: &ClassifierConfig, verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    tabimap_telemetry::init_with_config(TelemetryConfig {
        log_level,
        json: config.logging.json,
        ..TelemetryConfig::default()
    })
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.schema, cli.verbose)?;

    let ctx = Context {
        config: config.schema,
        json: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Exif { path } => commands::exif::run(&ctx, &path),
        Commands::Nearest { lat, lng, places, radius } => {
            commands::nearest::run(&ctx, lat, lng, &places, radius)
        }
        Commands::Classify { path, places, trips, trip } => {
            commands::classify::run(&ctx, &path, &places, trips.as_deref(), trip.as_deref())
        }
        Commands::Rank { lat, lng, places, limit } => {
            commands::rank::run(&ctx, lat, lng, &places, limit)
        }
        Commands::Trips { taken_at, trips, window } => {
            commands::trips::run(&ctx, &taken_at, &trips, window)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
