//! Tagfield - tag game simulator

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Tagfield v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let config = sim::Config::load(&path)?;
    info!("Loaded configuration from {}", path.display());
    info!("  Mode: {}", config.game.mode);
    info!("  Players: {}", config.game.players);
    info!("  Field: {} ({}x{})", config.field.kind, config.field.extent, config.field.extent);

    let outcome = sim::run(config).await?;
    match &outcome.winner {
        Some(winner) => info!("Winner: {} after {} ticks", winner, outcome.ticks),
        None => info!("No winner after {} ticks ({})", outcome.ticks, outcome.reason),
    }
    info!("Survivors: {}", outcome.survivors.join(", "));

    Ok(())
}
