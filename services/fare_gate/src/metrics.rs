use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

pub const PREDICTIONS_TOTAL: &str = "fare_gate_predictions_total";
pub const UPSTREAM_SECONDS: &str = "fare_gate_upstream_seconds";

/// Serve `/metrics` on `addr`. Must run inside the tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    Ok(())
}

/// `outcome` is `ok` or the `AppError` code of the response.
pub fn record_outcome(outcome: &'static str) {
    ::metrics::counter!(PREDICTIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_upstream_latency(elapsed: Duration) {
    ::metrics::histogram!(UPSTREAM_SECONDS).record(elapsed.as_secs_f64());
}
