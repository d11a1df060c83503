//! Recipe importer service.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                   RECIPE IMPORTER                     │
//!   multipart      │  ┌────────┐    ┌──────────┐    ┌──────────────────┐  │
//!   POST /extract ─┼─▶│  http  │───▶│ importer │───▶│ gemini (prompt + │──┼──▶ Gemini API
//!                  │  │ server │    │ pipeline │    │  inline images)  │  │
//!                  │  └────────┘    └────┬─────┘    └──────────────────┘  │
//!                  │                     │          ┌──────────────────┐  │
//!                  │                     ├─────────▶│ recipe (sanitize │  │
//!                  │                     │          │  + normalize)    │  │
//!                  │                     │          └──────────────────┘  │
//!                  │                     │          ┌──────────────────┐  │
//!   JSON response ◀┼─────────────────────┴─────────▶│ notion (blocks + │──┼──▶ Notion API
//!                  │                                │  page creation)  │  │
//!                  │                                └──────────────────┘  │
//!                  │  config · observability · resilience · lifecycle     │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use recipe_importer::config::resolve_config;
use recipe_importer::lifecycle::startup;
use recipe_importer::observability::logging;

#[derive(Parser)]
#[command(name = "recipe-importer")]
#[command(about = "Extract recipes from photos or text and publish them to Notion", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "RECIPE_IMPORTER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "recipe-importer starting");
    tracing::info!(
        bind_address = %config.server.bind_address,
        model = %config.gemini.model,
        units = ?config.normalization.units,
        target_language = config.normalization.target_language.as_deref().unwrap_or("source"),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
