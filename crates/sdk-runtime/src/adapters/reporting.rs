//! Default error reporter and aggregated event measurement reporter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use sdk_types::AppUrl;
use serde::Serialize;
use tracing::{debug, warn};

use super::ports::{ErrorReporter, MeasurementReporter};

lazy_static! {
    static ref SHARED_ERRORS: Arc<ErrorReport> = Arc::new(ErrorReport::new());
    static ref SHARED_AEM: Arc<AemReporter> = Arc::new(AemReporter::new());
}

// =============================================================================
// ERROR REPORT
// =============================================================================

/// An error held for upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedError {
    pub code: i64,
    pub domain: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ErrorReport {
    saved: RwLock<Vec<SavedError>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<ErrorReport> {
        Arc::clone(&SHARED_ERRORS)
    }

    pub fn saved_errors(&self) -> Vec<SavedError> {
        self.saved.read().clone()
    }

    pub fn reset(&self) {
        self.saved.write().clear();
    }
}

impl ErrorReporter for ErrorReport {
    fn save_error(&self, code: i64, domain: &str, message: &str) {
        warn!(code, domain, message, "SDK error saved for upload");
        self.saved.write().push(SavedError {
            code,
            domain: domain.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }
}

// =============================================================================
// AEM REPORTER
// =============================================================================

/// Collects opened URLs while enabled.
#[derive(Debug, Default)]
pub struct AemReporter {
    enabled: AtomicBool,
    handled: RwLock<Vec<AppUrl>>,
}

impl AemReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<AemReporter> {
        Arc::clone(&SHARED_AEM)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn handled_urls(&self) -> Vec<AppUrl> {
        self.handled.read().clone()
    }

    pub fn reset(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.handled.write().clear();
    }
}

impl MeasurementReporter for AemReporter {
    fn enable(&self) {
        if !self.enabled.swap(true, Ordering::SeqCst) {
            debug!("AEM reporter enabled");
        }
    }

    fn handle_url(&self, url: &AppUrl) {
        if !self.is_enabled() {
            return;
        }
        self.handled.write().push(url.clone());
    }
}
