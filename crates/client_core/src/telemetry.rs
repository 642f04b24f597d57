//! Client-side telemetry init (compact logs by default, pretty or JSON on request).

use data_runtime::configs::telemetry::TelemetryCfg;

/// Install the global `tracing` subscriber. Filter comes from the config's
/// log level (already merged with `LOG_LEVEL`). Safe to call more than once;
/// later calls are ignored.
pub fn init_client_telemetry(cfg: &TelemetryCfg) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    let filter = EnvFilter::try_new(cfg.level()).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = if cfg.json_logs.unwrap_or(false) {
        fmt::layer().json().boxed()
    } else if cfg.pretty.unwrap_or(false) {
        fmt::layer().pretty().boxed()
    } else {
        fmt::layer().compact().boxed()
    };
    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);
    if registry.try_init().is_ok() {
        tracing::info!(
            target: "telemetry",
            log_level = cfg.level(),
            json_logs = ?cfg.json_logs,
            "telemetry initialized"
        );
    }
}
