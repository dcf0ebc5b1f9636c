//! Zeebe DB monitor library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (serve, scan, families)
//! - `metrics`: Prometheus registry, scrape collection and HTTP router

pub mod cli;
pub mod commands;
pub mod metrics;

pub use cli::{Cli, Commands};
pub use commands::{list_families, run_scan, serve};
pub use metrics::{router, MonitorMetrics};
