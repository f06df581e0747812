//! Prometheus metrics for the lifecycle SDK.
//!
//! All metrics follow the naming convention: `sdk_<area>_<metric>_<unit>`
//!
//! Counters are usable before `register_metrics` runs; registration only makes
//! them visible through [`encode_metrics`].

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BOOTSTRAP METRICS
    // =========================================================================

    /// Completed bootstrap sequences
    pub static ref SDK_INITIALIZATIONS: Counter = Counter::new(
        "sdk_initializations_total",
        "Total number of completed SDK bootstrap sequences"
    ).expect("metric creation failed");

    /// Subsystems that failed to configure during bootstrap
    pub static ref SUBSYSTEM_CONFIGURATION_FAILURES: CounterVec = CounterVec::new(
        Opts::new(
            "sdk_subsystem_configuration_failures_total",
            "Subsystem configuration failures during bootstrap"
        ),
        &["subsystem"]
    ).expect("metric creation failed");

    /// Default collaborators materialized by the dependency container
    pub static ref DEFAULTS_MATERIALIZED: CounterVec = CounterVec::new(
        Opts::new(
            "sdk_dependency_defaults_materialized_total",
            "Default collaborators materialized on first resolution"
        ),
        &["role"]
    ).expect("metric creation failed");

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Lifecycle events fanned out to observers
    pub static ref LIFECYCLE_EVENTS_DISPATCHED: CounterVec = CounterVec::new(
        Opts::new(
            "sdk_lifecycle_events_dispatched_total",
            "Lifecycle events dispatched to registered observers"
        ),
        &["event"]  // event: did_finish_launching/did_become_active/will_resign_active/did_enter_background
    ).expect("metric creation failed");

    /// Currently registered observers (live count after the last mutation)
    pub static ref OBSERVERS_REGISTERED: Gauge = Gauge::new(
        "sdk_observers_registered",
        "Number of application observers currently registered"
    ).expect("metric creation failed");

    /// Opened URLs by routing outcome
    pub static ref URL_OPENS: CounterVec = CounterVec::new(
        Opts::new("sdk_url_opens_total", "URLs opened by the host"),
        &["outcome"]  // outcome: handled/unhandled
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Bootstrap
        Box::new(SDK_INITIALIZATIONS.clone()),
        Box::new(SUBSYSTEM_CONFIGURATION_FAILURES.clone()),
        Box::new(DEFAULTS_MATERIALIZED.clone()),
        // Lifecycle
        Box::new(LIFECYCLE_EVENTS_DISPATCHED.clone()),
        Box::new(OBSERVERS_REGISTERED.clone()),
        Box::new(URL_OPENS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
