//! fuelscope - browse fuel stations by brand, region and fuel type
//!
//! Loads the station listing (from the ministry feed or a saved file), applies
//! cascading filters and optionally ranks results by distance to a position.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fuelscope_catalog::{FilterEngine, FilterField};
use fuelscope_core::exit_codes;
use fuelscope_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;

/// Browse fuel stations by brand, region and fuel type
#[derive(Parser)]
#[command(name = "fuelscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .fuelscope.toml or fuelscope.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Read the listing from a JSON file instead of the network
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Filter selections shared by every subcommand that lists stations
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Brand label, e.g. REPSOL
    #[arg(short, long)]
    brand: Option<String>,

    /// Province, e.g. MADRID
    #[arg(short, long)]
    province: Option<String>,

    /// Municipality
    #[arg(short, long)]
    municipality: Option<String>,

    /// Locality
    #[arg(short = 'L', long)]
    locality: Option<String>,

    /// Fuel type, e.g. "Gasoleo A"
    #[arg(long)]
    fuel: Option<String>,
}

impl FilterArgs {
    fn value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Brand => self.brand.as_deref(),
            FilterField::Province => self.province.as_deref(),
            FilterField::Municipality => self.municipality.as_deref(),
            FilterField::Locality => self.locality.as_deref(),
            FilterField::FuelType => self.fuel.as_deref(),
        }
    }

    /// Applies the selections ancestors first, the order a user fills the
    /// dropdowns in.
    pub fn apply(&self, engine: &mut FilterEngine) {
        for field in FilterField::ALL {
            if let Some(value) = self.value(field) {
                engine.set_filter_field(field, value);
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List stations matching the filters, nearest first when a position is given
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Latitude of your position (decimal degrees)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of your position (decimal degrees)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Only stations within this many kilometers
        #[arg(short, long, requires = "lat")]
        radius: Option<f64>,

        /// Maximum number of stations to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show the values each filter currently offers
    Facets {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the fuel types of the listing
    FuelTypes,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = fuelscope_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let format = cli.format;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(report(&e, format)),
    }
}

/// Prints `e` and returns the exit code for it.
fn report(e: &anyhow::Error, format: OutputFormat) -> u8 {
    let Some(config_error) = e.downcast_ref::<fuelscope_core::Error>() else {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        return exit_codes::FAILURE;
    };

    match serde_json::to_string_pretty(&config_error.to_report()) {
        Ok(json) if format == OutputFormat::Json => println!("{}", json),
        _ => eprintln!("{} {}", "Error:".red().bold(), config_error),
    }
    exit_codes::CONFIG_ERROR
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = context::Context::load(cli.config.as_deref(), cli.input.as_deref(), cli.format).await?;

    match cli.command {
        Commands::List {
            filters,
            lat,
            lng,
            radius,
            limit,
        } => commands::list::run(&mut ctx, &filters, lat.zip(lng), radius, limit).await,
        Commands::Facets { filters } => commands::facets::run(&mut ctx, &filters),
        Commands::FuelTypes => commands::fuel_types::run(&ctx),
    }
}
