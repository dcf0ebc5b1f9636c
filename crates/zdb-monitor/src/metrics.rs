//! Prometheus metrics for the runtime database.
//!
//! On every scrape both gauges are reset and refilled from the aggregate
//! cache, so labels that disappeared from the store (a resolved incident
//! message, an emptied column family) are dropped from the output.
//!
//! Exported series:
//! - `zeebe_db_column_family_entries{db_name, column_family}`
//! - `zeebe_db_column_family_incident_entries{db_name, error_message}`
//! - `zeebe_db_read_duration_seconds` (histogram of aggregate recomputations)
//! - `process_*` (CPU, memory, file descriptors, start time; Linux only)

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{Histogram, HistogramOpts, IntGaugeVec, Opts, Registry, TextEncoder};
use tokio::sync::Mutex;
use tracing::error;

use zdb_aggregate::{AggregateCache, Aggregator};
use zdb_types::AggregateCount;

/// Registry plus the aggregate cache feeding it.
pub struct MonitorMetrics {
    registry: Registry,
    family_entries: IntGaugeVec,
    incident_entries: IntGaugeVec,
    cache: AggregateCache,
    db_name: String,
    scrape_lock: Mutex<()>,
}

impl MonitorMetrics {
    /// Register all metrics and wrap `aggregator` in a cache with `ttl`.
    pub fn new(
        aggregator: Aggregator,
        db_name: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let read_duration = Histogram::with_opts(HistogramOpts::new(
            "zeebe_db_read_duration_seconds",
            "Duration to count the entries for all the columnFamilies in ZeebeDB in seconds",
        ))?;
        let family_entries = IntGaugeVec::new(
            Opts::new(
                "zeebe_db_column_family_entries",
                "Number of elements per column families inside the db",
            ),
            &["db_name", "column_family"],
        )?;
        let incident_entries = IntGaugeVec::new(
            Opts::new(
                "zeebe_db_column_family_incident_entries",
                "Number of incidents per errorMessage inside the db",
            ),
            &["db_name", "error_message"],
        )?;

        registry.register(Box::new(read_duration.clone()))?;
        registry.register(Box::new(family_entries.clone()))?;
        registry.register(Box::new(incident_entries.clone()))?;
        register_process_metrics(&registry)?;

        let cache = AggregateCache::new(aggregator, ttl).with_scan_observer(Arc::new(
            move |elapsed: Duration| read_duration.observe(elapsed.as_secs_f64()),
        ));

        Ok(Self {
            registry,
            family_entries,
            incident_entries,
            cache,
            db_name: db_name.into(),
            scrape_lock: Mutex::new(()),
        })
    }

    /// Refresh gauges from the cache and encode the registry as text.
    pub async fn render(&self) -> Result<String, prometheus::Error> {
        let _scrape = self.scrape_lock.lock().await;

        let per_family = self.cache.entries_per_family().await;
        set_gauges(&self.family_entries, &self.db_name, &per_family);

        let per_message = self.cache.incidents_by_message().await;
        set_gauges(&self.incident_entries, &self.db_name, &per_message);

        let mut buffer = String::new();
        TextEncoder::new().encode_utf8(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }

    /// Release the store handle. Called once on shutdown.
    pub async fn close(&self) {
        self.cache.close().await;
    }
}

#[cfg(target_os = "linux")]
fn register_process_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    use prometheus::process_collector::ProcessCollector;
    registry.register(Box::new(ProcessCollector::for_self()))
}

#[cfg(not(target_os = "linux"))]
fn register_process_metrics(_registry: &Registry) -> Result<(), prometheus::Error> {
    Ok(())
}

fn set_gauges(gauges: &IntGaugeVec, db_name: &str, counts: &AggregateCount) {
    gauges.reset();
    for (label, count) in counts {
        gauges
            .with_label_values(&[db_name, label.as_str()])
            .set(i64::try_from(*count).unwrap_or(i64::MAX));
    }
}

async fn metrics(State(state): State<Arc<MonitorMetrics>>) -> Response {
    match state.render().await {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// HTTP routes: `/metrics` and `/healthz`.
pub fn router(state: Arc<MonitorMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/healthz", get(health))
        .with_state(state)
}
