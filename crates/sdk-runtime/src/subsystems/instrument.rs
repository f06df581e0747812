//! # Instrumentation
//!
//! The instrument manager wires crash and error reporting. It creates a crash
//! observer that shares its feature checker and settings, and attaches that
//! observer to the process crash handler when crash reporting is enabled.
//!
//! What an observer does with crash logs is outside this crate.

use std::sync::{Arc, Weak};

use lazy_static::lazy_static;
use parking_lot::RwLock;
use sdk_types::Feature;
use tracing::debug;

use super::{ConfigurableSubsystem, SubsystemError, SubsystemId, SubsystemWiring};
use crate::adapters::{ErrorReporter, FeatureChecker, Settings};

lazy_static! {
    static ref SHARED_HANDLER: Arc<CrashHandler> = Arc::new(CrashHandler::new());
    static ref SHARED_MANAGER: Arc<InstrumentManager> =
        Arc::new(InstrumentManager::new(CrashHandler::shared()));
}

// =============================================================================
// CRASH OBSERVER
// =============================================================================

pub struct CrashObserver {
    feature_checker: Arc<dyn FeatureChecker>,
    settings: Arc<dyn Settings>,
}

impl CrashObserver {
    pub fn new(feature_checker: Arc<dyn FeatureChecker>, settings: Arc<dyn Settings>) -> Self {
        Self {
            feature_checker,
            settings,
        }
    }

    pub fn feature_checker(&self) -> &Arc<dyn FeatureChecker> {
        &self.feature_checker
    }

    pub fn settings(&self) -> &Arc<dyn Settings> {
        &self.settings
    }
}

// =============================================================================
// CRASH HANDLER
// =============================================================================

/// Process crash handler. Observers are held weakly.
#[derive(Default)]
pub struct CrashHandler {
    observers: RwLock<Vec<Weak<CrashObserver>>>,
}

impl CrashHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<CrashHandler> {
        Arc::clone(&SHARED_HANDLER)
    }

    /// Attach `observer` unless it is already attached.
    pub fn add_observer(&self, observer: &Arc<CrashObserver>) {
        let mut observers = self.observers.write();
        observers.retain(|o| o.strong_count() > 0);
        if !observers.iter().any(|o| Weak::as_ptr(o) == Arc::as_ptr(observer)) {
            observers.push(Arc::downgrade(observer));
        }
    }

    pub fn remove_observer(&self, observer: &Arc<CrashObserver>) {
        self.observers
            .write()
            .retain(|o| o.strong_count() > 0 && Weak::as_ptr(o) != Arc::as_ptr(observer));
    }

    pub fn is_observing(&self, observer: &Arc<CrashObserver>) -> bool {
        self.observers
            .read()
            .iter()
            .any(|o| Weak::as_ptr(o) == Arc::as_ptr(observer) && o.strong_count() > 0)
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }
}

// =============================================================================
// INSTRUMENT MANAGER
// =============================================================================

#[derive(Clone)]
struct InstrumentWiring {
    feature_checker: Arc<dyn FeatureChecker>,
    settings: Arc<dyn Settings>,
    error_reporter: Arc<dyn ErrorReporter>,
    crash_observer: Arc<CrashObserver>,
}

pub struct InstrumentManager {
    crash_handler: Arc<CrashHandler>,
    wiring: RwLock<Option<InstrumentWiring>>,
}

impl InstrumentManager {
    pub fn new(crash_handler: Arc<CrashHandler>) -> Self {
        Self {
            crash_handler,
            wiring: RwLock::new(None),
        }
    }

    pub fn shared() -> Arc<InstrumentManager> {
        Arc::clone(&SHARED_MANAGER)
    }

    pub fn crash_handler(&self) -> &Arc<CrashHandler> {
        &self.crash_handler
    }

    pub fn feature_checker(&self) -> Option<Arc<dyn FeatureChecker>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.feature_checker))
    }

    pub fn settings(&self) -> Option<Arc<dyn Settings>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.settings))
    }

    pub fn error_reporter(&self) -> Option<Arc<dyn ErrorReporter>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.error_reporter))
    }

    pub fn crash_observer(&self) -> Option<Arc<CrashObserver>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.crash_observer))
    }
}

impl ConfigurableSubsystem for InstrumentManager {
    fn id(&self) -> SubsystemId {
        SubsystemId::InstrumentManager
    }

    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError> {
        let deps = wiring.dependencies;
        let feature_checker = Arc::clone(&deps.feature_checker);
        let settings = Arc::clone(&deps.settings);
        let crash_observer = Arc::new(CrashObserver::new(
            Arc::clone(&feature_checker),
            Arc::clone(&settings),
        ));

        if feature_checker.is_enabled(Feature::CrashReport) {
            self.crash_handler.add_observer(&crash_observer);
            debug!("Crash observer attached");
        }

        let previous = self.wiring.write().replace(InstrumentWiring {
            feature_checker,
            settings,
            error_reporter: Arc::clone(&deps.error_reporter),
            crash_observer,
        });
        if let Some(previous) = previous {
            self.crash_handler.remove_observer(&previous.crash_observer);
        }
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.wiring.read().is_some()
    }

    fn reset(&self) {
        if let Some(previous) = self.wiring.write().take() {
            self.crash_handler.remove_observer(&previous.crash_observer);
        }
    }
}
