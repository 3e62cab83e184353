use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use geodash::api::AppState;
use geodash::{
    AggregatedWeatherView, Aggregator, Coordinate, DashboardConfig, Insights, LocationSelection,
    telemetry, web,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-source weather and natural-event dashboard")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        /// Bind address, overrides the configured host
        #[arg(long)]
        host: Option<String>,

        /// Port, overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Aggregate every source for one location and print the view as JSON
    Lookup {
        /// Coordinates as "lat,lon"
        coordinates: String,

        /// Treat the coordinates as a named search result
        #[arg(long)]
        name: Option<String>,
    },

    /// Forward-geocode a place name
    Search {
        query: String,
    },
}

#[derive(Serialize)]
struct LookupOutput {
    view: AggregatedWeatherView,
    insights: Insights,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = DashboardConfig::load_from_path(args.config)?;
    telemetry::init_tracing(&config.logging, args.verbose)?;

    let aggregator =
        Arc::new(Aggregator::from_config(&config).context("Failed to build upstream clients")?);

    match args.command {
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::new(aggregator, config.display.clone());
            web::run(state, &host, port).await
        }
        Command::Lookup { coordinates, name } => {
            let coordinate: Coordinate = coordinates.parse()?;
            let selection = match name {
                Some(name) => LocationSelection::search(coordinate, name),
                None => LocationSelection::map_click(coordinate),
            };

            let view = aggregator.run(selection).await;
            info!(failures = view.failures, "Lookup finished");
            let insights = Insights::derive(&view, &config.display);
            let output = serde_json::to_string_pretty(&LookupOutput { view, insights })?;
            println!("{output}");
            Ok(())
        }
        Command::Search { query } => {
            let places = aggregator.geocoding().search(&query).await?;
            if places.is_empty() {
                println!("No results for {query}");
            }
            for place in places {
                println!("{} ({})", place.display_name, place.coordinate);
            }
            Ok(())
        }
    }
}
