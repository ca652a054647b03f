//! Storm density viewer.
//!
//! Loads a boundary and a storm-track dataset, then renders density
//! heatmaps, storm paths or group animations from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use storm_common::YearRange;
use storm_viewer::commands;
use storm_viewer::config::ViewerConfig;

#[derive(Parser, Debug)]
#[command(name = "storm-viewer")]
#[command(about = "Render storm density heatmaps confined to a landmass")]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, env = "STORM_CONFIG")]
    config: Option<PathBuf>,

    /// Boundary file (overrides config)
    #[arg(long)]
    boundary: Option<PathBuf>,

    /// Observation file (overrides config)
    #[arg(long)]
    observations: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the weighted heatmap and one heatmap per time group
    Render {
        /// Year window, e.g. "1950-2000"
        #[arg(short, long, value_parser = parse_range)]
        range: Option<YearRange>,
    },

    /// Print every step of one storm as JSON lines
    Storm {
        /// Storm to show, e.g. "KATRINA - 2005"
        query: String,
    },

    /// Play the time groups and write one PNG per tick
    Animate {
        /// Number of frames to write
        #[arg(short, long, default_value_t = 5)]
        ticks: usize,

        /// Year window, e.g. "1950-2000"
        #[arg(short, long, value_parser = parse_range)]
        range: Option<YearRange>,
    },

    /// Print the storm search list
    Names,
}

fn parse_range(s: &str) -> Result<YearRange, String> {
    YearRange::parse(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ViewerConfig::load(args.config.as_deref())?;
    if let Some(path) = args.boundary {
        config.boundary_path = path;
    }
    if let Some(path) = args.observations {
        config.observations_path = path;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    info!(
        boundary = ?config.boundary_path,
        observations = ?config.observations_path,
        "Starting storm viewer"
    );

    let mut explorer = commands::open_explorer(&config)?;

    match args.command {
        Command::Render { range } => {
            let report = commands::render(&mut explorer, range, &config.output_dir)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Storm { query } => {
            for frame in commands::storm_frames(&mut explorer, &query)? {
                println!("{}", serde_json::to_string(&frame)?);
            }
        }
        Command::Animate { ticks, range } => {
            if let Some(range) = range {
                explorer.set_time_range(range.start, range.end)?;
            }
            let files = commands::animate(&mut explorer, ticks, &config.output_dir).await?;
            for file in files {
                println!("{}", file.display());
            }
        }
        Command::Names => {
            for name in explorer.storm_names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
