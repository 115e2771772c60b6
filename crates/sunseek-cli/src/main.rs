mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sunseek_core::{GeoPoint, IndexType};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::commands::{parse_offset, parse_point, WindowArgs};

#[derive(Debug, Parser)]
#[command(name = "sunseek")]
#[command(about = "Find sunny and comfortable destinations within driving distance")]
struct Cli {
    /// Print view models as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank destinations around a starting location
    Search {
        /// Starting location, e.g. "London"
        #[arg(long)]
        from: String,
        /// Use these coordinates for the origin instead of looking it up (LAT,LON)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Option<GeoPoint>,
        /// Search radius in miles; clamped to 1-200
        #[arg(long)]
        radius: Option<f64>,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Suggest place names for partial input
    Suggest {
        text: String,
        /// Replay the text one keystroke at a time through the debouncer
        #[arg(long)]
        as_typed: bool,
        /// Delay between replayed keystrokes
        #[arg(long, default_value = "100")]
        keystroke_ms: u64,
    },
    /// Paint the projected weather index around a point
    Browse {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Radius in miles; clamped to 1-200
        #[arg(long, default_value = "50")]
        radius: f64,
        /// Weather index to paint (sunny or comfort)
        #[arg(long, default_value = "sunny")]
        index: IndexType,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Show where the radius circle and handle land
    Radius {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Radius in miles; defaults to SUNSEEK_DEFAULT_RADIUS_MILES
        #[arg(long)]
        radius: Option<f64>,
        /// Text typed into the radius field
        #[arg(long)]
        input: Option<String>,
        /// Drop the radius handle at LAT,LON
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        drag_to: Option<GeoPoint>,
        /// Pan the map by DX,DY pixels afterwards
        #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
        pan: Option<(f64, f64)>,
    },
    /// Move fixture dates so the earliest forecast is today
    ShiftDates {
        /// Fixture file; defaults to SUNSEEK_FIXTURE_PATH
        #[arg(long)]
        file: Option<PathBuf>,
        /// Target date for the earliest forecast (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<String>,
        /// Allow moving dates backwards
        #[arg(long)]
        allow_past: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sunseek_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("sunseek: run `sunseek --help` for commands");
        return Ok(());
    };

    if let Commands::ShiftDates {
        file,
        today,
        allow_past,
    } = &command
    {
        let path = file.clone().unwrap_or_else(|| config.fixture_path.clone());
        return commands::run_shift_dates(&path, today.as_deref(), *allow_past);
    }

    let mut app = App::new(config)?;
    let result = match command {
        Commands::Search {
            from,
            at,
            radius,
            window,
        } => commands::run_search(&mut app, &from, at, radius, &window, cli.json).await,
        Commands::Suggest {
            text,
            as_typed,
            keystroke_ms,
        } => commands::run_suggest(&app, &text, as_typed, keystroke_ms, cli.json).await,
        Commands::Browse {
            lat,
            lon,
            radius,
            index,
            window,
        } => match GeoPoint::new(lat, lon) {
            Ok(center) => {
                commands::run_browse(&mut app, center, radius, index, &window, cli.json).await
            }
            Err(err) => Err(err.into()),
        },
        Commands::Radius {
            lat,
            lon,
            radius,
            input,
            drag_to,
            pan,
        } => match GeoPoint::new(lat, lon) {
            Ok(center) => commands::run_radius(
                &mut app,
                center,
                radius,
                input.as_deref(),
                drag_to,
                pan,
                cli.json,
            ),
            Err(err) => Err(err.into()),
        },
        Commands::ShiftDates { .. } => Ok(()),
    };

    tracing::debug!(mode = ?app.mode(), "command finished");
    app.shutdown();
    result
}
