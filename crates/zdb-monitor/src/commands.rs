//! Command implementations for the monitor.
//!
//! Handles:
//! - serve: Load config, expose `/metrics` until SIGINT/SIGTERM
//! - scan: Run both aggregates once and print them
//! - families: Print the column-family table

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use zdb_aggregate::Aggregator;
use zdb_storage::keys::range_for_family;
use zdb_storage::StoreHandle;
use zdb_types::{AggregateCount, Settings, ALL_COLUMN_FAMILIES};

use crate::metrics::{router, MonitorMetrics};

/// Load settings and apply CLI overrides (highest precedence).
fn load_settings(
    config_path: Option<&str>,
    runtime_dir_override: Option<&str>,
    port_override: Option<u16>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    apply_overrides(settings, runtime_dir_override, port_override, log_level_override)
}

fn apply_overrides(
    mut settings: Settings,
    runtime_dir_override: Option<&str>,
    port_override: Option<u16>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    if let Some(runtime_dir) = runtime_dir_override {
        settings.runtime_dir = runtime_dir.to_string();
    }
    if let Some(port) = port_override {
        settings.listen_port = port;
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Serve metrics until a shutdown signal arrives.
///
/// The store is not touched at startup: the first scrape opens it.
pub async fn serve(
    config_path: Option<&str>,
    runtime_dir_override: Option<&str>,
    port_override: Option<u16>,
    log_level_override: Option<&str>,
) -> Result<()> {
    let settings = load_settings(
        config_path,
        runtime_dir_override,
        port_override,
        log_level_override,
    )?;
    init_logging(&settings.log_level)?;

    info!("Zeebe DB monitor starting...");
    info!("Configuration:");
    info!("  Runtime directory: {}", settings.runtime_dir);
    info!("  Listen address: {}", settings.listen_addr());
    info!("  Cache TTL: {}s", settings.cache_ttl_secs);
    info!("  Log level: {}", settings.log_level);

    let aggregator = Aggregator::new(StoreHandle::new(settings.expanded_runtime_dir()));
    let metrics = Arc::new(
        MonitorMetrics::new(aggregator, settings.db_name.clone(), settings.cache_ttl())
            .context("Failed to register metrics")?,
    );

    let addr: SocketAddr = settings
        .listen_addr()
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving metrics on http://{}/metrics", addr);

    let result = axum::serve(listener, router(metrics.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Release the read-only handle before exit
    metrics.close().await;
    info!("Metrics server shutdown complete");

    result.context("Metrics server error")
}

#[derive(Debug, Serialize)]
struct ScanReport {
    column_families: AggregateCount,
    incidents_by_message: AggregateCount,
}

/// Run both aggregates once and print the result as JSON.
///
/// Unlike scrapes, a failed scan is reported as an error.
pub async fn run_scan(
    config_path: Option<&str>,
    runtime_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<()> {
    let settings = load_settings(config_path, runtime_dir_override, None, log_level_override)?;
    init_logging(&settings.log_level)?;

    let aggregator = Aggregator::new(StoreHandle::new(settings.expanded_runtime_dir()));
    let report = ScanReport {
        column_families: aggregator
            .try_count_entries_per_family(ALL_COLUMN_FAMILIES)
            .await
            .context("Failed to count column family entries")?,
        incidents_by_message: aggregator
            .try_count_incidents_by_message()
            .await
            .context("Failed to count incidents")?,
    };
    aggregator.close().await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print every known column family with its key range.
pub fn list_families() {
    println!("{:<4} {:<72} {:<18} {:<18}", "ID", "NAME", "LOWER", "UPPER");
    for family in ALL_COLUMN_FAMILIES {
        let range = range_for_family(*family);
        println!(
            "{:<4} {:<72} {:<18} {:<18}",
            family.id,
            family.name,
            hex(&range.lower),
            hex(&range.upper)
        );
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_prefix() {
        assert_eq!(hex(&range_for_family(zdb_types::ColumnFamily::INCIDENTS).lower), "0000000000000021");
    }

    #[test]
    fn test_cli_overrides_win() {
        let settings = apply_overrides(
            Settings::default(),
            Some("/srv/zeebe/runtime"),
            Some(9300),
            Some("debug"),
        )
        .unwrap();
        assert_eq!(settings.runtime_dir, "/srv/zeebe/runtime");
        assert_eq!(settings.listen_port, 9300);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.db_name, "runtime");
    }

    #[test]
    fn test_absent_overrides_keep_settings() {
        let base = Settings {
            runtime_dir: "/data/runtime".to_string(),
            listen_port: 9100,
            ..Settings::default()
        };
        let settings = apply_overrides(base, None, None, None).unwrap();
        assert_eq!(settings.runtime_dir, "/data/runtime");
        assert_eq!(settings.listen_port, 9100);
    }

    #[test]
    fn test_overrides_are_validated() {
        assert!(apply_overrides(Settings::default(), Some(""), None, None).is_err());
    }
}
