//! Sign Replay - Main Entry Point

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sign_replay::{init_logging, load_config, replay_file, ConfigOverrides};
use tracing::info;

/// Replay recorded sign classifications through the sign tracker
#[derive(Debug, Parser)]
#[command(name = "sign-replay", version, about)]
struct Cli {
    /// Recording to replay (one JSON frame per line)
    input: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second, 0 replays as fast as possible
    #[arg(long)]
    rate_hz: Option<u32>,

    /// Maximum number of signs displayed at once
    #[arg(long)]
    capacity: Option<usize>,

    /// Emit one JSON object per frame
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    config.apply_overrides(&ConfigOverrides {
        rate_hz: cli.rate_hz,
        capacity: cli.capacity,
        json: cli.json,
    });

    init_logging(&config.log_level)?;
    info!("=== Sign Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let mut out = std::io::stdout();
    let summary = replay_file(&cli.input, &config, &mut out).await?;

    info!(
        "Replayed {} frames, {} signs tracked, {} displayed",
        summary.frames, summary.tracked, summary.displayed
    );

    Ok(())
}
