//! # SDK Telemetry
//!
//! Logging and metrics setup shared by the lifecycle SDK crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sdk_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//! // Logs and metrics are now being collected
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SDK_SERVICE_NAME` | `lifecycle-sdk` | Service name in logs |
//! | `SDK_LOG_LEVEL` | `info` | Log level filter |
//! | `SDK_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `SDK_JSON_LOGS` | `false` | JSON formatted logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, StructuredLogger};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, DEFAULTS_MATERIALIZED,
    LIFECYCLE_EVENTS_DISPATCHED, OBSERVERS_REGISTERED, SDK_INITIALIZATIONS,
    SUBSYSTEM_CONFIGURATION_FAILURES, URL_OPENS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the host process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logger = init_logging(&config)?;

    Ok(TelemetryGuard {
        _logger: logger,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logger: StructuredLogger,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
