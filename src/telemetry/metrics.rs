//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::MySqlPool;
use std::time::Duration;

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let buckets = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register descriptions and zero values so HELP/TYPE lines are present
/// from startup.
pub fn describe_metrics() {
    describe_counter!("students_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "students_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "students_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        "students_token_validations_total",
        "Bearer token validations by outcome"
    );
    describe_gauge!(
        "students_db_pool_connections_active",
        "Number of active database connections"
    );
    describe_gauge!(
        "students_db_pool_connections_idle",
        "Number of idle database connections"
    );

    counter!("students_token_validations_total", "outcome" => "valid").absolute(0);
    gauge!("students_http_requests_in_flight").set(0.0);
}

/// Sample pool usage every `interval` until the runtime shuts down.
pub fn spawn_pool_metrics_task(pool: MySqlPool, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let idle = pool.num_idle() as f64;
            let size = pool.size() as f64;
            gauge!("students_db_pool_connections_idle").set(idle);
            gauge!("students_db_pool_connections_active").set(size - idle);
        }
    });
}
