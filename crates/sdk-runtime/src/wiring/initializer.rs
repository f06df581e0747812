//! # SDK Initializer
//!
//! One-time bootstrap of the SDK subsystems.
//!
//! ## Bootstrap Sequence
//!
//! ```text
//! initialize(launch)
//!   │
//!   ├─ 0. SDK-initialize event (kit bitmask gate, every call)
//!   │
//!   ├─ state != NotStarted ──→ return
//!   │
//!   ├─ 1. NotStarted → InProgress
//!   ├─ 2. configure subsystems in order (failures reported, not fatal)
//!   ├─ 3. subscribe host lifecycle events
//!   ├─ 4. event logger: observe lifecycle, auto reset source application
//!   ├─ 5. event logger: session source from launch
//!   ├─ 6. background refresh status
//!   └─ 7. InProgress → Completed
//! ```
//!
//! The state lock is released before step 2, so a collaborator that calls
//! back into `initialize` during bootstrap sees `InProgress` and returns.
//! Step 0 runs under its own lock: concurrent callers log at most one event
//! per change of the persisted bitmask.

use std::sync::Arc;

use lifecycle_bus::NotificationCenter;
use parking_lot::Mutex;
use sdk_telemetry::{log_event, SDK_INITIALIZATIONS, SUBSYSTEM_CONFIGURATION_FAILURES};
use sdk_types::LaunchContext;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::adapters::EventParameters;
use crate::container::{
    DependencyContainer, Kit, ResolvedDependencies, SdkConfig, KITS_BITMASK_KEY,
    SDK_INITIALIZE_EVENT,
};
use crate::subsystems::{error_domain::SDK_ERROR_DOMAIN, Subsystems, SubsystemWiring};

/// Progress of the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Subscribes the host lifecycle events during bootstrap.
pub trait HostEventRegistrar: Send + Sync {
    fn register_host_events(&self, center: &Arc<dyn NotificationCenter>);
}

pub struct SdkInitializer {
    state: Mutex<InitializationState>,
    /// Serializes the read-compare-write of the persisted kit bitmask.
    kits_check: Mutex<()>,
    subsystems: Subsystems,
    config: SdkConfig,
}

impl SdkInitializer {
    pub fn new(config: SdkConfig, subsystems: Subsystems) -> Self {
        Self {
            state: Mutex::new(InitializationState::NotStarted),
            kits_check: Mutex::new(()),
            subsystems,
            config,
        }
    }

    pub fn state(&self) -> InitializationState {
        *self.state.lock()
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == InitializationState::Completed
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn subsystems(&self) -> &Subsystems {
        &self.subsystems
    }

    /// Run the bootstrap once. Returns `true` for the call that performed it.
    #[instrument(skip_all, name = "sdk_initialize")]
    pub fn initialize(
        &self,
        container: &DependencyContainer,
        launch: &LaunchContext,
        registrar: &dyn HostEventRegistrar,
    ) -> bool {
        if container.settings().is_auto_log_app_events_enabled() {
            self.log_sdk_initialize(container);
        }

        {
            let mut state = self.state.lock();
            if *state != InitializationState::NotStarted {
                debug!(state = ?*state, "Initialization already started");
                return false;
            }
            *state = InitializationState::InProgress;
        }

        info!("Initializing SDK subsystems...");
        let deps = container.resolve_all();

        info!("Phase 1: Configuring subsystems");
        self.configure_subsystems(&deps);

        info!("Phase 2: Subscribing host lifecycle events");
        registrar.register_host_events(&deps.notification_center);

        info!("Phase 3: Starting session tracking");
        deps.event_logger
            .start_observing_application_lifecycle_notifications();
        deps.event_logger.register_auto_reset_source_application();
        if launch.has_session_source() {
            deps.event_logger
                .set_source_application(launch.source_application(), launch.url());
        }
        deps.background_event_logger
            .log_background_refresh_status(launch.background_refresh_status());

        *self.state.lock() = InitializationState::Completed;
        SDK_INITIALIZATIONS.inc();
        info!("SDK initialized");
        true
    }

    fn configure_subsystems(&self, deps: &ResolvedDependencies) {
        let request_factory = Arc::clone(&self.subsystems.request_factory);
        let wiring = SubsystemWiring {
            dependencies: deps,
            request_factory: &request_factory,
            config: &self.config,
        };

        for subsystem in self.subsystems.ordered() {
            let id = subsystem.id();
            match subsystem.configure(&wiring) {
                Ok(()) => debug!(subsystem = %id, "Subsystem configured"),
                Err(e) => {
                    log_event!(
                        warn,
                        "initializer",
                        "Subsystem configuration failed",
                        subsystem = %id,
                        error = %e
                    );
                    SUBSYSTEM_CONFIGURATION_FAILURES
                        .with_label_values(&[id.name()])
                        .inc();
                    deps.error_reporter
                        .save_error(e.kind.code(), SDK_ERROR_DOMAIN, &e.to_string());
                }
            }
        }
    }

    /// Log the SDK-initialize event when the installed kit set differs from
    /// the last one persisted. Returns whether the event was logged.
    pub fn log_sdk_initialize(&self, container: &DependencyContainer) -> bool {
        let _guard = self.kits_check.lock();
        let store = container.persistent_store();
        let bitmask = self.config.kits_bitmask();
        let persisted = store.integer(KITS_BITMASK_KEY).unwrap_or(0);
        if persisted == bitmask {
            return false;
        }

        store.set_integer(KITS_BITMASK_KEY, bitmask);

        let mut parameters = EventParameters::new();
        parameters.insert(Kit::Core.param_key(), Value::from(1));
        for kit in self.config.installed_kits.iter().filter(|k| k.bit().is_some()) {
            parameters.insert(kit.param_key(), Value::from(1));
        }

        container
            .event_logger()
            .log_internal_event(SDK_INITIALIZE_EVENT, parameters, false);
        info!(bitmask, persisted, "Installed kits changed");
        true
    }

    /// Return to `NotStarted` and drop every subsystem's wiring.
    pub fn reset(&self) {
        self.subsystems.reset();
        *self.state.lock() = InitializationState::NotStarted;
    }
}
