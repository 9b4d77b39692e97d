//! Kiro Session Service - Main Entry Point
//!
//! Usage: `kiro-server [settings-file]`

use api::{init_logging, run_server, Settings};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Kiro Session Service v{} ===", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref())?;

    run_server(settings).await
}
