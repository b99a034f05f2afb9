//! # Floe
//!
//! Headless entry point for Floe Arena. Runs one match against the
//! configured enemies with an autopilot player.
//!
//! Usage: `floe [CONFIG]`, where `CONFIG` defaults to `floe.toml`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use floe_engine::{app, EngineConfig};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("floe=info".parse()?))
        .init();

    info!("Floe Arena starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    let summary = app::run(&config)?;
    if app::is_win(&summary) {
        info!("Victory in {:.1}s", summary.elapsed);
    } else {
        info!("No victory ({:?}) after {:.1}s", summary.outcome, summary.elapsed);
    }

    info!("Floe Arena shutdown complete");
    Ok(())
}
