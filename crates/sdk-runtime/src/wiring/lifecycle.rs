//! # Lifecycle Bridge
//!
//! Turns host lifecycle signals into initializer calls and observer
//! callbacks.
//!
//! ```text
//!  NotificationCenter ──(HostEvent)──→ callback (Weak<LifecycleBridge>)
//!                                          │
//!   host delegate calls ──────────────────→│
//!                                          ↓
//!                              ensure initialized ──→ SdkInitializer
//!                                          │
//!                              update ApplicationState
//!                                          │
//!                                          ↓
//!                                  ObserverRegistry::notify
//! ```
//!
//! Host subscriptions hold only a weak reference to the bridge, so a dropped
//! context never keeps receiving events.

use std::sync::{Arc, Weak};

use lifecycle_bus::{HostCallback, HostEvent, NotificationCenter, SubscriptionToken};
use parking_lot::{Mutex, RwLock};
use sdk_types::{AppUrl, ApplicationState, Feature, LaunchContext, LaunchOptions, OpenUrlOptions};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::initializer::{HostEventRegistrar, InitializationState, SdkInitializer};
use super::token_expirer::AccessTokenExpirer;
use crate::container::DependencyContainer;
use crate::registry::{LifecycleEvent, ObserverRegistry};
use crate::router::UrlRouter;

/// Handler name recorded with each host subscription.
pub fn handler_name(event: HostEvent) -> &'static str {
    match event {
        HostEvent::DidEnterBackground => "application_did_enter_background",
        HostEvent::DidBecomeActive => "application_did_become_active",
        HostEvent::WillResignActive => "application_will_resign_active",
    }
}

struct HostSubscription {
    center: Arc<dyn NotificationCenter>,
    token: SubscriptionToken,
}

pub struct LifecycleBridge {
    id: Uuid,
    weak_self: Weak<LifecycleBridge>,
    container: Arc<DependencyContainer>,
    initializer: Arc<SdkInitializer>,
    registry: Arc<ObserverRegistry>,
    expirer: Arc<AccessTokenExpirer>,
    router: UrlRouter,
    state: RwLock<ApplicationState>,
    subscriptions: Mutex<Vec<HostSubscription>>,
}

impl LifecycleBridge {
    pub fn new(
        container: Arc<DependencyContainer>,
        initializer: Arc<SdkInitializer>,
        registry: Arc<ObserverRegistry>,
        expirer: Arc<AccessTokenExpirer>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            id: Uuid::new_v4(),
            weak_self: weak_self.clone(),
            container,
            initializer,
            registry,
            expirer,
            router: UrlRouter::new(),
            state: RwLock::new(ApplicationState::Unknown),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    /// Identity used for host subscriptions.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn application_state(&self) -> ApplicationState {
        *self.state.read()
    }

    /// Tokens of the active host subscriptions.
    pub fn subscription_tokens(&self) -> Vec<SubscriptionToken> {
        self.subscriptions.lock().iter().map(|s| s.token).collect()
    }

    /// Bootstrap with `launch` unless bootstrap has already started.
    pub fn ensure_initialized(&self, launch: &LaunchContext) -> bool {
        if self.initializer.state() != InitializationState::NotStarted {
            return false;
        }
        self.initializer.initialize(&self.container, launch, self)
    }

    // =========================================================================
    // HOST SIGNALS
    // =========================================================================

    fn handle_host_event(&self, event: HostEvent) {
        debug!(event = event.name(), "Host event received");
        match event {
            HostEvent::DidEnterBackground => self.did_enter_background(),
            HostEvent::DidBecomeActive => self.did_become_active(),
            HostEvent::WillResignActive => self.will_resign_active(),
        }
    }

    pub fn did_finish_launching(&self, options: &LaunchOptions) -> bool {
        let launch = LaunchContext::from_options(options);
        self.ensure_initialized(&launch);

        let token_wallet = self.container.token_wallet();
        token_wallet.set_current(token_wallet.cached_token());
        let authentication_wallet = self.container.authentication_token_wallet();
        authentication_wallet.set_current(authentication_wallet.cached_token());

        self.container
            .server_configuration_provider()
            .load_server_configuration(None);

        let profiles = self.container.profile_provider();
        let cached = profiles.fetch_cached_profile();
        debug!(restored = cached.is_some(), "Current profile restored from cache");
        profiles.set_current(cached);

        let handled = self.registry.notify(LifecycleEvent::DidFinishLaunching(&launch));
        info!(handled, "Application finished launching");
        handled
    }

    pub fn did_become_active(&self) {
        self.ensure_initialized(&LaunchContext::default());
        *self.state.write() = ApplicationState::Active;

        if self.container.settings().is_auto_log_app_events_enabled() {
            self.container.event_logger().activate_app();
        }
        self.expirer.expire_if_needed(self.container.token_wallet().as_ref());
        self.registry.notify(LifecycleEvent::DidBecomeActive);
    }

    pub fn will_resign_active(&self) {
        self.ensure_initialized(&LaunchContext::default());
        *self.state.write() = ApplicationState::Inactive;
        self.registry.notify(LifecycleEvent::WillResignActive);
    }

    pub fn did_enter_background(&self) {
        self.ensure_initialized(&LaunchContext::default());
        *self.state.write() = ApplicationState::Background;
        self.registry.notify(LifecycleEvent::DidEnterBackground);
    }

    /// Handle a URL opened by the host. The measurement feature is checked
    /// once, before any listener runs.
    pub fn open_url(&self, url: &AppUrl, options: &OpenUrlOptions) -> bool {
        let event_logger = self.container.event_logger();
        event_logger.set_source_application(options.source_application.as_deref(), Some(url));

        if self.container.feature_checker().is_enabled(Feature::Aem) {
            let reporter = self.container.measurement_reporter();
            reporter.enable();
            reporter.handle_url(url);
        }

        let listeners = self.registry.open_url_listeners();
        self.router.route(url, options, &listeners)
    }

    /// Drop every host subscription and forget the application state.
    pub fn reset(&self) {
        let subscriptions: Vec<HostSubscription> = self.subscriptions.lock().drain(..).collect();
        for subscription in subscriptions {
            if let Err(e) = subscription.center.remove_observer(subscription.token) {
                warn!(error = %e, "Host subscription already gone");
            }
        }
        *self.state.write() = ApplicationState::Unknown;
    }
}

impl HostEventRegistrar for LifecycleBridge {
    fn register_host_events(&self, center: &Arc<dyn NotificationCenter>) {
        let mut subscriptions = self.subscriptions.lock();
        for event in HostEvent::all() {
            let weak = self.weak_self.clone();
            let callback: HostCallback = Arc::new(move |event: HostEvent| {
                if let Some(bridge) = weak.upgrade() {
                    bridge.handle_host_event(event);
                }
            });

            let token = center.add_observer(self.id, event, handler_name(event), callback);
            if !subscriptions.iter().any(|s| s.token == token) {
                subscriptions.push(HostSubscription {
                    center: Arc::clone(center),
                    token,
                });
            }
        }
        debug!(count = subscriptions.len(), "Host lifecycle events subscribed");
    }
}
