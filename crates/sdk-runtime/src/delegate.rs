//! # Application Delegate
//!
//! The SDK context a host application talks to. It owns the dependency
//! container, the observer registry, the initializer and the lifecycle bridge.
//!
//! ```text
//!                 ┌─────────────────────────────────────────┐
//!   host app ───→ │          ApplicationDelegate            │
//!                 │                                         │
//!                 │  DependencyContainer   ObserverRegistry │
//!                 │          │                    ▲         │
//!                 │          ▼                    │         │
//!                 │    SdkInitializer ←── LifecycleBridge   │
//!                 └─────────────────────────────────────────┘
//! ```
//!
//! Tests build fresh contexts with [`ApplicationDelegate::new`] or the
//! builder; the host uses the single [`ApplicationDelegate::shared`] instance.

use std::sync::Arc;

use lazy_static::lazy_static;
use sdk_telemetry::log_event;
use sdk_types::{AppUrl, ApplicationState, LaunchContext, LaunchOptions, OpenUrlOptions};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::SdkSettings;
use crate::container::{DependencyContainer, DependencySet, SdkConfig};
use crate::registry::{ApplicationObserver, ObserverRegistry};
use crate::subsystems::Subsystems;
use crate::wiring::{AccessTokenExpirer, InitializationState, LifecycleBridge, SdkInitializer};

lazy_static! {
    static ref SHARED: Arc<ApplicationDelegate> = Arc::new(
        ApplicationDelegate::builder()
            .subsystems(Subsystems::shared())
            .build()
    );
}

pub struct ApplicationDelegate {
    container: Arc<DependencyContainer>,
    registry: Arc<ObserverRegistry>,
    initializer: Arc<SdkInitializer>,
    expirer: Arc<AccessTokenExpirer>,
    bridge: Arc<LifecycleBridge>,
}

/// Builder for [`ApplicationDelegate`].
#[derive(Default)]
pub struct ApplicationDelegateBuilder {
    dependencies: DependencySet,
    config: Option<SdkConfig>,
    subsystems: Option<Subsystems>,
}

impl ApplicationDelegateBuilder {
    pub fn dependencies(mut self, dependencies: DependencySet) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Static configuration. Unless a settings collaborator is supplied, the
    /// context's settings are seeded from it.
    pub fn config(mut self, config: SdkConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn subsystems(mut self, subsystems: Subsystems) -> Self {
        self.subsystems = Some(subsystems);
        self
    }

    pub fn build(self) -> ApplicationDelegate {
        let Self {
            mut dependencies,
            config,
            subsystems,
        } = self;

        if let Some(config) = &config {
            if dependencies.settings.is_none() {
                dependencies.settings = Some(Arc::new(SdkSettings::from_config(config)));
            }
        }

        let container = Arc::new(DependencyContainer::with_overrides(dependencies));
        let initializer = Arc::new(SdkInitializer::new(
            config.unwrap_or_default(),
            subsystems.unwrap_or_default(),
        ));
        let registry = Arc::new(ObserverRegistry::new());
        let expirer = Arc::new(AccessTokenExpirer::new(container.notification_center()));
        let bridge = LifecycleBridge::new(
            Arc::clone(&container),
            Arc::clone(&initializer),
            Arc::clone(&registry),
            Arc::clone(&expirer),
        );

        debug!(bridge = %bridge.id(), "Application delegate created");
        ApplicationDelegate {
            container,
            registry,
            initializer,
            expirer,
            bridge,
        }
    }
}

impl ApplicationDelegate {
    /// A context with `dependencies` overriding the defaults.
    pub fn new(dependencies: DependencySet) -> Self {
        Self::builder().dependencies(dependencies).build()
    }

    pub fn builder() -> ApplicationDelegateBuilder {
        ApplicationDelegateBuilder::default()
    }

    /// The process-wide context.
    pub fn shared() -> Arc<ApplicationDelegate> {
        Arc::clone(&SHARED)
    }

    // =========================================================================
    // BOOTSTRAP
    // =========================================================================

    /// Bootstrap the SDK with the host's launch options. Repeated calls only
    /// re-run the installed-kits check.
    pub fn initialize_sdk(&self, options: &LaunchOptions) -> bool {
        let launch = LaunchContext::from_options(options);
        self.initializer
            .initialize(&self.container, &launch, self.bridge.as_ref())
    }

    /// Log the SDK-initialize event if the installed kits changed.
    pub fn log_sdk_initialize(&self) -> bool {
        self.initializer.log_sdk_initialize(&self.container)
    }

    pub fn is_sdk_initialized(&self) -> bool {
        self.initializer.is_initialized()
    }

    pub fn initialization_state(&self) -> InitializationState {
        self.initializer.state()
    }

    // =========================================================================
    // HOST LIFECYCLE
    // =========================================================================

    /// Returns whether any observer handled the launch.
    pub fn application_did_finish_launching(&self, options: &LaunchOptions) -> bool {
        self.bridge.did_finish_launching(options)
    }

    pub fn application_did_become_active(&self) {
        self.bridge.did_become_active();
    }

    pub fn application_will_resign_active(&self) {
        self.bridge.will_resign_active();
    }

    pub fn application_did_enter_background(&self) {
        self.bridge.did_enter_background();
    }

    /// Returns whether any observer handled the URL.
    pub fn application_open_url(&self, url: &AppUrl, options: &OpenUrlOptions) -> bool {
        self.bridge.open_url(url, options)
    }

    /// [`Self::application_open_url`] with the raw host option map.
    pub fn application_open_url_with_options(&self, url: &AppUrl, options: &LaunchOptions) -> bool {
        self.application_open_url(url, &OpenUrlOptions::from_options(options))
    }

    /// [`Self::application_open_url`] for hosts that report the source
    /// application and annotation directly.
    pub fn application_open_url_from_source(
        &self,
        url: &AppUrl,
        source_application: Option<&str>,
        annotation: Option<Value>,
    ) -> bool {
        let options = OpenUrlOptions {
            source_application: source_application.map(str::to_string),
            annotation,
            ..OpenUrlOptions::default()
        };
        self.application_open_url(url, &options)
    }

    pub fn application_state(&self) -> ApplicationState {
        self.bridge.application_state()
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register `observer`. The registry keeps it alive until it is removed
    /// or the context is reset.
    pub fn add_observer<O: ApplicationObserver + 'static>(&self, observer: &Arc<O>) -> bool {
        let observer: Arc<dyn ApplicationObserver> = observer.clone();
        self.registry.add(observer)
    }

    pub fn remove_observer<O: ApplicationObserver + 'static>(&self, observer: &Arc<O>) -> bool {
        let observer: Arc<dyn ApplicationObserver> = observer.clone();
        self.registry.remove(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.registry.count()
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    pub fn dependencies(&self) -> &Arc<DependencyContainer> {
        &self.container
    }

    pub fn config(&self) -> &SdkConfig {
        self.initializer.config()
    }

    pub fn subsystems(&self) -> &Subsystems {
        self.initializer.subsystems()
    }

    pub fn access_token_expirer(&self) -> &Arc<AccessTokenExpirer> {
        &self.expirer
    }

    /// Identity the context subscribes host events under.
    pub fn id(&self) -> Uuid {
        self.bridge.id()
    }

    /// Return the context to its freshly constructed state: host
    /// subscriptions, bootstrap state, subsystem wiring, observers and every
    /// collaborator override.
    pub fn reset_for_testing(&self) {
        self.bridge.reset();
        self.initializer.reset();
        self.registry.clear();
        self.container.reset();
        log_event!(info, "delegate", "Application delegate reset", context = %self.id());
    }
}
