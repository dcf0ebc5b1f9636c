//! CLI argument parsing for the monitor.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Zeebe DB Monitor
///
/// Read-only Prometheus exporter for a Zeebe runtime database.
#[derive(Parser, Debug)]
#[command(name = "zdb-monitor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/zeebe-db-monitor/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Monitor commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve metrics over HTTP until interrupted
    Serve {
        /// Override the runtime database directory
        #[arg(long)]
        runtime_dir: Option<String>,

        /// Override the metrics listener port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run both aggregates once and print them as JSON
    Scan {
        /// Override the runtime database directory
        #[arg(long)]
        runtime_dir: Option<String>,
    },

    /// List known column families and their key ranges
    Families,
}
