//! Zeebe DB Monitor
//!
//! Exposes column-family and incident statistics of a Zeebe runtime
//! database as Prometheus metrics. The database is opened read-only.
//!
//! # Usage
//!
//! ```bash
//! zdb-monitor serve [--runtime-dir PATH] [--port PORT]
//! zdb-monitor scan [--runtime-dir PATH]
//! zdb-monitor families
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/zeebe-db-monitor/config.toml)
//! 3. Environment variables (ZDB_MONITOR__*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use zdb_monitor::{list_families, run_scan, serve, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { runtime_dir, port } => {
            serve(
                cli.config.as_deref(),
                runtime_dir.as_deref(),
                port,
                cli.log_level.as_deref(),
            )
            .await?;
        }
        Commands::Scan { runtime_dir } => {
            run_scan(
                cli.config.as_deref(),
                runtime_dir.as_deref(),
                cli.log_level.as_deref(),
            )
            .await?;
        }
        Commands::Families => {
            list_families();
        }
    }

    Ok(())
}
