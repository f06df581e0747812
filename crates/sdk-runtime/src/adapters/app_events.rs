//! # App Events
//!
//! Default event logger and background status logger.
//!
//! Network flushing of events is outside this crate; the default logger keeps
//! the session state the orchestrator feeds it and emits every internal event
//! as a structured log line.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use sdk_types::{AppUrl, BackgroundRefreshStatus};
use serde::Serialize;
use tracing::{debug, info};

use super::ports::{BackgroundEventLogger, EventLogger, EventParameters};

/// Event logged each time the app becomes active.
pub const ACTIVATE_APP_EVENT: &str = "fb_mobile_activate_app";

lazy_static! {
    static ref SHARED: Arc<AppEvents> = Arc::new(AppEvents::new());
    static ref SHARED_BACKGROUND: Arc<BackgroundRefreshLogger> =
        Arc::new(BackgroundRefreshLogger::new(AppEvents::shared()));
}

/// An internal event accepted by [`AppEvents`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedEvent {
    pub name: String,
    pub parameters: EventParameters,
    pub is_implicitly_logged: bool,
}

#[derive(Debug, Clone, Default)]
struct SessionSource {
    application: Option<String>,
    url: Option<AppUrl>,
}

#[derive(Debug, Default)]
pub struct AppEvents {
    observing_lifecycle: AtomicBool,
    auto_reset_source: AtomicBool,
    source: RwLock<SessionSource>,
    events: RwLock<Vec<LoggedEvent>>,
}

impl AppEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<AppEvents> {
        Arc::clone(&SHARED)
    }

    pub fn is_observing_lifecycle(&self) -> bool {
        self.observing_lifecycle.load(Ordering::SeqCst)
    }

    pub fn is_auto_reset_source_registered(&self) -> bool {
        self.auto_reset_source.load(Ordering::SeqCst)
    }

    pub fn source_application(&self) -> Option<String> {
        self.source.read().application.clone()
    }

    pub fn source_url(&self) -> Option<AppUrl> {
        self.source.read().url.clone()
    }

    /// Clears the session source. Invoked on background when auto reset is
    /// registered.
    pub fn reset_source_application(&self) {
        if self.is_auto_reset_source_registered() {
            *self.source.write() = SessionSource::default();
        }
    }

    /// Events logged so far, oldest first.
    pub fn logged_events(&self) -> Vec<LoggedEvent> {
        self.events.read().clone()
    }

    /// Stop observing, forget the session source and drop logged events.
    pub fn reset(&self) {
        self.observing_lifecycle.store(false, Ordering::SeqCst);
        self.auto_reset_source.store(false, Ordering::SeqCst);
        *self.source.write() = SessionSource::default();
        self.events.write().clear();
    }
}

impl EventLogger for AppEvents {
    fn start_observing_application_lifecycle_notifications(&self) {
        if !self.observing_lifecycle.swap(true, Ordering::SeqCst) {
            debug!("App events observing lifecycle notifications");
        }
    }

    fn register_auto_reset_source_application(&self) {
        self.auto_reset_source.store(true, Ordering::SeqCst);
    }

    fn set_source_application(&self, source_application: Option<&str>, url: Option<&AppUrl>) {
        *self.source.write() = SessionSource {
            application: source_application.map(str::to_string),
            url: url.cloned(),
        };
    }

    fn activate_app(&self) {
        self.log_internal_event(ACTIVATE_APP_EVENT, EventParameters::new(), true);
    }

    fn log_internal_event(&self, name: &str, parameters: EventParameters, is_implicitly_logged: bool) {
        info!(
            event = name,
            implicit = is_implicitly_logged,
            parameters = ?parameters,
            "Internal event logged"
        );
        self.events.write().push(LoggedEvent {
            name: name.to_string(),
            parameters,
            is_implicitly_logged,
        });
    }
}

/// Logs the background refresh status through an [`EventLogger`].
pub struct BackgroundRefreshLogger {
    event_logger: Arc<dyn EventLogger>,
}

impl BackgroundRefreshLogger {
    pub fn new(event_logger: Arc<dyn EventLogger>) -> Self {
        Self { event_logger }
    }

    pub fn shared() -> Arc<BackgroundRefreshLogger> {
        Arc::clone(&SHARED_BACKGROUND)
    }

    /// Event name for a given status.
    pub fn event_name(status: BackgroundRefreshStatus) -> String {
        format!("fb_sdk_background_status_{}", status.as_str())
    }
}

impl BackgroundEventLogger for BackgroundRefreshLogger {
    fn log_background_refresh_status(&self, status: BackgroundRefreshStatus) {
        self.event_logger
            .log_internal_event(&Self::event_name(status), EventParameters::new(), true);
    }
}
