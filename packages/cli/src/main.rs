#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the water report toolchain.
//!
//! Renders a readings file to `GeoJSON`, runs address lookups through the
//! same map context the interactive page uses, converts gauge feeds, and
//! starts the report service.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "water_report", about = "Water report map toolchain")]
struct Cli {
    /// Geocoding service TOML to use instead of the bundled Nominatim config
    #[arg(long, global = true)]
    geocoder_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a readings file and print the overlays as a `GeoJSON` `FeatureCollection`
    Render {
        /// URL or path of the readings JSON (e.g. `http://localhost:8080/WaterReport/json`)
        url: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Search for an address and apply the chosen suggestion to the map
    Geocode {
        /// Free-text address
        text: String,
        /// Index of the suggestion to select
        #[arg(long, default_value = "0")]
        pick: usize,
    },
    /// Drop the location marker at a coordinate and resolve its address
    Reverse {
        /// Latitude (WGS84)
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude (WGS84)
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
    /// Convert a river gauge feed (URL or path) into readings JSON
    Feed {
        /// URL or path of the feed XML
        source: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Start the report service (configured by `BIND_ADDR`, `PORT`,
    /// `REPORT_TITLE`, `REPORT_WINDOW_DAYS`)
    Serve {
        /// Override `BIND_ADDR`
        #[arg(long)]
        bind: Option<String>,
        /// Override `PORT`
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let geocoder_config = cli.geocoder_config.as_deref();

    match cli.command {
        Commands::Render { url, out } => {
            commands::render(&url, out.as_deref()).await?;
        }
        Commands::Geocode { text, pick } => {
            commands::geocode(&text, pick, geocoder_config).await?;
        }
        Commands::Reverse { lat, lng } => {
            commands::reverse(lat, lng, geocoder_config).await?;
        }
        Commands::Feed { source, out } => commands::feed(&source, out.as_deref()).await?,
        Commands::Serve { bind, port } => {
            let mut config = water_report_server::ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }

            // The server runs on actix's own runtime; keep it off tokio's
            // worker threads.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(water_report_server::run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}
