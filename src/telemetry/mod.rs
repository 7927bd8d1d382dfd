//! Telemetry initialization: metrics and structured logging

pub mod metrics;

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "students_core=info,tower_http=debug";

/// Initialise logging and, when enabled, the Prometheus recorder.
///
/// Returns the handle the server renders `/metrics` from.
pub fn init(config: &TelemetryConfig) -> anyhow::Result<Option<PrometheusHandle>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.json_logs() {
        // Flatten event fields so `message` sits at the top level.
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if !config.metrics_enabled {
        return Ok(None);
    }
    let handle = metrics::install_prometheus_recorder()?;
    metrics::describe_metrics();
    Ok(Some(handle))
}
