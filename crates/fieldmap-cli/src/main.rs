mod geocode;
mod search;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fieldmap_core::{country_by_key, distance_km, Coordinate, COUNTRIES};
use fieldmap_geocode::GeocodingClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fieldmap")]
#[command(about = "Find events and venues around a place")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter candidates and optionally export the map view as GeoJSON
    Search(SearchArgs),
    /// Resolve free text to a position
    Geocode {
        text: String,
        /// Country key or ISO code to bias the lookup (e.g. belgique, be)
        #[arg(long)]
        country: Option<String>,
    },
    /// Great-circle distance in kilometres
    Distance {
        #[arg(allow_hyphen_values = true)]
        from_lat: f64,
        #[arg(allow_hyphen_values = true)]
        from_lon: f64,
        #[arg(allow_hyphen_values = true)]
        to_lat: f64,
        #[arg(allow_hyphen_values = true)]
        to_lon: f64,
    },
    /// List known countries and their centroids
    Countries,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Free text matched against titles and location labels, then geocoded
    #[arg(long)]
    query: Option<String>,
    #[arg(long, default_value = "all")]
    category: String,
    #[arg(long, default_value = "all")]
    sub_region: String,
    /// Country key (e.g. france); recenters on its centroid
    #[arg(long)]
    country: Option<String>,
    /// Date fragment matched against YYYY-MM-DD (e.g. 2025-06)
    #[arg(long)]
    date: Option<String>,
    /// Search radius in kilometres; 0 means unbounded
    #[arg(long, default_value_t = 0.0)]
    radius_km: f64,
    /// Use this position as the device location
    #[arg(long, value_name = "LAT,LON", value_parser = parse_lat_lon, allow_hyphen_values = true)]
    near: Option<Coordinate>,
    /// Write the synced map layers here as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,
    /// Candidates file; defaults to FIELDMAP_CANDIDATES_PATH
    #[arg(long, env = "FIELDMAP_CANDIDATES_PATH")]
    candidates: Option<PathBuf>,
}

/// Parses `"LAT,LON"` into a validated coordinate.
fn parse_lat_lon(raw: &str) -> Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{raw}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    Coordinate::new(lon, lat).map_err(|e| e.to_string())
}

/// ISO code for a country key, or the input itself when it is not a key.
fn country_code(country: &str) -> String {
    country_by_key(country).map_or_else(
        || country.trim().to_ascii_lowercase(),
        |c| c.iso_code.to_string(),
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = fieldmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&config, args).await?,
        Some(Commands::Geocode { text, country }) => {
            let client = GeocodingClient::from_config(&config)?;
            let code = country.as_deref().map(country_code);
            println!("{}", geocode::lookup_line(&client, &text, code.as_deref()).await);
        }
        Some(Commands::Distance {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
        }) => {
            println!("{:.3} km", distance_km(from_lat, from_lon, to_lat, to_lon));
        }
        Some(Commands::Countries) => {
            for country in COUNTRIES {
                println!(
                    "{:<12} {}  {:<16} {}",
                    country.key, country.iso_code, country.name, country.centroid
                );
            }
        }
        None => println!("fieldmap: run with --help for usage"),
    }

    Ok(())
}
