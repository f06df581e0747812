//! SDK error domain. Routes errors raised anywhere in the SDK to the
//! configured error reporter.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;

use super::{ConfigurableSubsystem, SubsystemError, SubsystemId, SubsystemWiring};
use crate::adapters::ErrorReporter;

/// Domain string saved with every SDK error.
pub const SDK_ERROR_DOMAIN: &str = "com.facebook.sdk.core";

lazy_static! {
    static ref SHARED: Arc<ErrorDomain> = Arc::new(ErrorDomain::new());
}

#[derive(Default)]
pub struct ErrorDomain {
    reporter: RwLock<Option<Arc<dyn ErrorReporter>>>,
}

impl ErrorDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<ErrorDomain> {
        Arc::clone(&SHARED)
    }

    pub fn error_reporter(&self) -> Option<Arc<dyn ErrorReporter>> {
        self.reporter.read().clone()
    }

    /// Save an error through the configured reporter. Dropped when unconfigured.
    pub fn report(&self, code: i64, message: &str) -> bool {
        match self.error_reporter() {
            Some(reporter) => {
                reporter.save_error(code, SDK_ERROR_DOMAIN, message);
                true
            }
            None => {
                debug!(code, message, "Error dropped, no reporter configured");
                false
            }
        }
    }
}

impl ConfigurableSubsystem for ErrorDomain {
    fn id(&self) -> SubsystemId {
        SubsystemId::ErrorDomain
    }

    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError> {
        *self.reporter.write() = Some(Arc::clone(&wiring.dependencies.error_reporter));
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.reporter.read().is_some()
    }

    fn reset(&self) {
        *self.reporter.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_has_no_reporter() {
        let domain = ErrorDomain::new();
        assert!(domain.error_reporter().is_none());
        assert!(!domain.report(1, "dropped"));
    }
}
