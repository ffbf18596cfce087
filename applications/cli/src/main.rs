/// Cadence - terminal player screen over the in-memory engine
use anyhow::Context;
use cadence_playback::{MemoryEngine, PlaybackController, PlayerEvent};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod repl;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence playback queue controller", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cadence.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog JSON file, overrides the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Simulated engine latency per command, in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.catalog {
        config.catalog = Some(path);
    }
    let catalog = config.load_catalog().context("loading catalog")?;
    info!("Loaded {} listing(s)", catalog.listings.len());

    let engine = MemoryEngine::new().with_latency(Duration::from_millis(cli.latency_ms));
    let controller = PlaybackController::new(engine);
    controller
        .setup(&config.player)
        .await
        .map_err(error::CliError::from)?;

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(PlayerEvent::Notice { message }) => eprintln!("! {message}"),
                Ok(event) => debug!("Player event: {:?}", event),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} player events", missed),
                Err(RecvError::Closed) => break,
            }
        }
    });

    repl::run(&controller, &catalog).await
}
