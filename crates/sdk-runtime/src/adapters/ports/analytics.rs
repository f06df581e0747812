//! # Analytics Ports
//!
//! Event logging, background status logging, error reporting and the
//! aggregated event measurement reporter.

use std::collections::BTreeMap;

use sdk_types::{AppUrl, BackgroundRefreshStatus};
use serde_json::Value;

/// Parameters attached to a logged event.
pub type EventParameters = BTreeMap<String, Value>;

/// Application event logger (telemetry collaborator).
pub trait EventLogger: Send + Sync {
    /// Begin observing host lifecycle notifications for session tracking.
    fn start_observing_application_lifecycle_notifications(&self);

    /// Reset the session source application whenever the app backgrounds.
    fn register_auto_reset_source_application(&self);

    /// Record the application and URL the current session originated from.
    fn set_source_application(&self, source_application: Option<&str>, url: Option<&AppUrl>);

    /// Record that the app became active.
    fn activate_app(&self);

    /// Log an SDK-internal event.
    fn log_internal_event(&self, name: &str, parameters: EventParameters, is_implicitly_logged: bool);
}

/// Logger for the host's background refresh status.
pub trait BackgroundEventLogger: Send + Sync {
    fn log_background_refresh_status(&self, status: BackgroundRefreshStatus);
}

/// Sink for SDK errors that must not abort the host.
pub trait ErrorReporter: Send + Sync {
    /// Persist an error for later upload.
    fn save_error(&self, code: i64, domain: &str, message: &str);
}

/// Aggregated event measurement reporter, fed with every opened URL while the
/// measurement feature is enabled.
pub trait MeasurementReporter: Send + Sync {
    fn enable(&self);
    fn handle_url(&self, url: &AppUrl);
}
