//! # Dependency Container
//!
//! Holds exactly one active collaborator per [`Role`].
//!
//! ```text
//! resolve(role)
//!     │
//!     ├── overridden? ──────────────→ override (set by configure)
//!     │
//!     └── materialized? ── no ──→ Role default `shared()` ──┐
//!                 │                                        │
//!                 yes ←────────────── cached in slot ←─────┘
//! ```
//!
//! ## Thread Safety
//!
//! - Each slot is a `parking_lot::RwLock`; reads never block each other
//! - Lazy defaults use double-checked locking so concurrent first reads
//!   materialize a single instance
//! - `configure` replaces slots under their write locks

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use lifecycle_bus::{InMemoryNotificationCenter, NotificationCenter};
use parking_lot::RwLock;
use sdk_telemetry::DEFAULTS_MATERIALIZED;
use tracing::{debug, info};

use crate::adapters::{
    AccessTokenManager, AccessTokenWallet, AemReporter, AppEvents, AuthenticationTokenManager,
    AuthenticationTokenWallet, BackgroundEventLogger, BackgroundRefreshLogger, ErrorReport,
    ErrorReporter, EventLogger, FeatureChecker, GateKeeper, GateKeeperManager,
    MeasurementReporter, PersistentStore, ProfileManager, ProfileProvider, SdkSettings,
    ServerConfigurationManager, ServerConfigurationProvider, Settings, UserDefaults,
};
use crate::subsystems::{ConfigurableSubsystem, FeatureManager};

// =============================================================================
// ROLES
// =============================================================================

/// A pluggable collaborator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    NotificationCenter,
    TokenWallet,
    AuthenticationTokenWallet,
    Settings,
    FeatureChecker,
    GateKeeper,
    EventLogger,
    BackgroundEventLogger,
    PersistentStore,
    ServerConfigurationProvider,
    ProfileProvider,
    ErrorReporter,
    MeasurementReporter,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::NotificationCenter,
            Role::TokenWallet,
            Role::AuthenticationTokenWallet,
            Role::Settings,
            Role::FeatureChecker,
            Role::GateKeeper,
            Role::EventLogger,
            Role::BackgroundEventLogger,
            Role::PersistentStore,
            Role::ServerConfigurationProvider,
            Role::ProfileProvider,
            Role::ErrorReporter,
            Role::MeasurementReporter,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::NotificationCenter => "notification_center",
            Role::TokenWallet => "token_wallet",
            Role::AuthenticationTokenWallet => "authentication_token_wallet",
            Role::Settings => "settings",
            Role::FeatureChecker => "feature_checker",
            Role::GateKeeper => "gate_keeper",
            Role::EventLogger => "event_logger",
            Role::BackgroundEventLogger => "background_event_logger",
            Role::PersistentStore => "persistent_store",
            Role::ServerConfigurationProvider => "server_configuration_provider",
            Role::ProfileProvider => "profile_provider",
            Role::ErrorReporter => "error_reporter",
            Role::MeasurementReporter => "measurement_reporter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// DEPENDENCY SET
// =============================================================================

/// A partial assignment of collaborators to roles.
///
/// Roles left unset keep their current value in the container.
#[derive(Default, Clone)]
pub struct DependencySet {
    pub notification_center: Option<Arc<dyn NotificationCenter>>,
    pub token_wallet: Option<Arc<dyn AccessTokenWallet>>,
    pub authentication_token_wallet: Option<Arc<dyn AuthenticationTokenWallet>>,
    pub settings: Option<Arc<dyn Settings>>,
    pub feature_checker: Option<Arc<dyn FeatureChecker>>,
    pub gate_keeper: Option<Arc<dyn GateKeeper>>,
    pub event_logger: Option<Arc<dyn EventLogger>>,
    pub background_event_logger: Option<Arc<dyn BackgroundEventLogger>>,
    pub persistent_store: Option<Arc<dyn PersistentStore>>,
    pub server_configuration_provider: Option<Arc<dyn ServerConfigurationProvider>>,
    pub profile_provider: Option<Arc<dyn ProfileProvider>>,
    pub error_reporter: Option<Arc<dyn ErrorReporter>>,
    pub measurement_reporter: Option<Arc<dyn MeasurementReporter>>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notification_center(mut self, center: Arc<dyn NotificationCenter>) -> Self {
        self.notification_center = Some(center);
        self
    }

    pub fn with_token_wallet(mut self, wallet: Arc<dyn AccessTokenWallet>) -> Self {
        self.token_wallet = Some(wallet);
        self
    }

    pub fn with_authentication_token_wallet(
        mut self,
        wallet: Arc<dyn AuthenticationTokenWallet>,
    ) -> Self {
        self.authentication_token_wallet = Some(wallet);
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn Settings>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_feature_checker(mut self, checker: Arc<dyn FeatureChecker>) -> Self {
        self.feature_checker = Some(checker);
        self
    }

    pub fn with_gate_keeper(mut self, gate_keeper: Arc<dyn GateKeeper>) -> Self {
        self.gate_keeper = Some(gate_keeper);
        self
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.event_logger = Some(logger);
        self
    }

    pub fn with_background_event_logger(mut self, logger: Arc<dyn BackgroundEventLogger>) -> Self {
        self.background_event_logger = Some(logger);
        self
    }

    pub fn with_persistent_store(mut self, store: Arc<dyn PersistentStore>) -> Self {
        self.persistent_store = Some(store);
        self
    }

    pub fn with_server_configuration_provider(
        mut self,
        provider: Arc<dyn ServerConfigurationProvider>,
    ) -> Self {
        self.server_configuration_provider = Some(provider);
        self
    }

    pub fn with_profile_provider(mut self, provider: Arc<dyn ProfileProvider>) -> Self {
        self.profile_provider = Some(provider);
        self
    }

    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = Some(reporter);
        self
    }

    pub fn with_measurement_reporter(mut self, reporter: Arc<dyn MeasurementReporter>) -> Self {
        self.measurement_reporter = Some(reporter);
        self
    }

    /// Roles this set assigns.
    pub fn roles(&self) -> Vec<Role> {
        let present = [
            (Role::NotificationCenter, self.notification_center.is_some()),
            (Role::TokenWallet, self.token_wallet.is_some()),
            (
                Role::AuthenticationTokenWallet,
                self.authentication_token_wallet.is_some(),
            ),
            (Role::Settings, self.settings.is_some()),
            (Role::FeatureChecker, self.feature_checker.is_some()),
            (Role::GateKeeper, self.gate_keeper.is_some()),
            (Role::EventLogger, self.event_logger.is_some()),
            (
                Role::BackgroundEventLogger,
                self.background_event_logger.is_some(),
            ),
            (Role::PersistentStore, self.persistent_store.is_some()),
            (
                Role::ServerConfigurationProvider,
                self.server_configuration_provider.is_some(),
            ),
            (Role::ProfileProvider, self.profile_provider.is_some()),
            (Role::ErrorReporter, self.error_reporter.is_some()),
            (Role::MeasurementReporter, self.measurement_reporter.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(role, set)| set.then_some(role))
            .collect()
    }
}

impl fmt::Debug for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencySet")
            .field("roles", &self.roles())
            .finish()
    }
}

/// Every role resolved at one point in time.
#[derive(Clone)]
pub struct ResolvedDependencies {
    pub notification_center: Arc<dyn NotificationCenter>,
    pub token_wallet: Arc<dyn AccessTokenWallet>,
    pub authentication_token_wallet: Arc<dyn AuthenticationTokenWallet>,
    pub settings: Arc<dyn Settings>,
    pub feature_checker: Arc<dyn FeatureChecker>,
    pub gate_keeper: Arc<dyn GateKeeper>,
    pub event_logger: Arc<dyn EventLogger>,
    pub background_event_logger: Arc<dyn BackgroundEventLogger>,
    pub persistent_store: Arc<dyn PersistentStore>,
    pub server_configuration_provider: Arc<dyn ServerConfigurationProvider>,
    pub profile_provider: Arc<dyn ProfileProvider>,
    pub error_reporter: Arc<dyn ErrorReporter>,
    pub measurement_reporter: Arc<dyn MeasurementReporter>,
}

// =============================================================================
// SLOTS
// =============================================================================

struct Slot<T: ?Sized> {
    role: Role,
    value: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Slot<T> {
    fn new(role: Role) -> Self {
        Self {
            role,
            value: RwLock::new(None),
        }
    }

    fn get_or_default(&self, default: impl FnOnce() -> Arc<T>) -> Arc<T> {
        if let Some(value) = self.value.read().as_ref() {
            return Arc::clone(value);
        }

        let mut guard = self.value.write();
        if let Some(value) = guard.as_ref() {
            return Arc::clone(value);
        }

        let value = default();
        debug!(role = %self.role, "Materialized default collaborator");
        DEFAULTS_MATERIALIZED
            .with_label_values(&[self.role.name()])
            .inc();
        *guard = Some(Arc::clone(&value));
        value
    }

    fn set(&self, value: Arc<T>) {
        *self.value.write() = Some(value);
    }

    fn is_set(&self) -> bool {
        self.value.read().is_some()
    }

    fn clear(&self) {
        *self.value.write() = None;
    }
}

// =============================================================================
// CONTAINER
// =============================================================================

/// The active collaborator set of one SDK context.
pub struct DependencyContainer {
    notification_center: Slot<dyn NotificationCenter>,
    token_wallet: Slot<dyn AccessTokenWallet>,
    authentication_token_wallet: Slot<dyn AuthenticationTokenWallet>,
    settings: Slot<dyn Settings>,
    feature_checker: Slot<dyn FeatureChecker>,
    gate_keeper: Slot<dyn GateKeeper>,
    event_logger: Slot<dyn EventLogger>,
    background_event_logger: Slot<dyn BackgroundEventLogger>,
    persistent_store: Slot<dyn PersistentStore>,
    server_configuration_provider: Slot<dyn ServerConfigurationProvider>,
    profile_provider: Slot<dyn ProfileProvider>,
    error_reporter: Slot<dyn ErrorReporter>,
    measurement_reporter: Slot<dyn MeasurementReporter>,
    overrides: RwLock<HashSet<Role>>,
}

impl Default for DependencyContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyContainer {
    /// A container resolving every role to its default.
    pub fn new() -> Self {
        Self {
            notification_center: Slot::new(Role::NotificationCenter),
            token_wallet: Slot::new(Role::TokenWallet),
            authentication_token_wallet: Slot::new(Role::AuthenticationTokenWallet),
            settings: Slot::new(Role::Settings),
            feature_checker: Slot::new(Role::FeatureChecker),
            gate_keeper: Slot::new(Role::GateKeeper),
            event_logger: Slot::new(Role::EventLogger),
            background_event_logger: Slot::new(Role::BackgroundEventLogger),
            persistent_store: Slot::new(Role::PersistentStore),
            server_configuration_provider: Slot::new(Role::ServerConfigurationProvider),
            profile_provider: Slot::new(Role::ProfileProvider),
            error_reporter: Slot::new(Role::ErrorReporter),
            measurement_reporter: Slot::new(Role::MeasurementReporter),
            overrides: RwLock::new(HashSet::new()),
        }
    }

    /// A container with `overrides` applied.
    pub fn with_overrides(overrides: DependencySet) -> Self {
        let container = Self::new();
        container.configure(overrides);
        container
    }

    /// Replace the collaborators assigned in `overrides`.
    ///
    /// An override stays in effect until [`DependencyContainer::reset`].
    pub fn configure(&self, overrides: DependencySet) {
        let roles = overrides.roles();
        if roles.is_empty() {
            return;
        }

        let DependencySet {
            notification_center,
            token_wallet,
            authentication_token_wallet,
            settings,
            feature_checker,
            gate_keeper,
            event_logger,
            background_event_logger,
            persistent_store,
            server_configuration_provider,
            profile_provider,
            error_reporter,
            measurement_reporter,
        } = overrides;

        if let Some(v) = notification_center {
            self.notification_center.set(v);
        }
        if let Some(v) = token_wallet {
            self.token_wallet.set(v);
        }
        if let Some(v) = authentication_token_wallet {
            self.authentication_token_wallet.set(v);
        }
        if let Some(v) = settings {
            self.settings.set(v);
        }
        if let Some(v) = feature_checker {
            self.feature_checker.set(v);
        }
        if let Some(v) = gate_keeper {
            self.gate_keeper.set(v);
        }
        if let Some(v) = event_logger {
            self.event_logger.set(v);
        }
        if let Some(v) = background_event_logger {
            self.background_event_logger.set(v);
        }
        if let Some(v) = persistent_store {
            self.persistent_store.set(v);
        }
        if let Some(v) = server_configuration_provider {
            self.server_configuration_provider.set(v);
        }
        if let Some(v) = profile_provider {
            self.profile_provider.set(v);
        }
        if let Some(v) = error_reporter {
            self.error_reporter.set(v);
        }
        if let Some(v) = measurement_reporter {
            self.measurement_reporter.set(v);
        }

        info!(roles = ?roles, "Collaborators overridden");
        self.overrides.write().extend(roles);
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn notification_center(&self) -> Arc<dyn NotificationCenter> {
        self.notification_center
            .get_or_default(|| InMemoryNotificationCenter::shared())
    }

    pub fn token_wallet(&self) -> Arc<dyn AccessTokenWallet> {
        self.token_wallet
            .get_or_default(|| AccessTokenManager::shared())
    }

    pub fn authentication_token_wallet(&self) -> Arc<dyn AuthenticationTokenWallet> {
        self.authentication_token_wallet
            .get_or_default(|| AuthenticationTokenManager::shared())
    }

    pub fn settings(&self) -> Arc<dyn Settings> {
        self.settings.get_or_default(|| SdkSettings::shared())
    }

    pub fn feature_checker(&self) -> Arc<dyn FeatureChecker> {
        self.feature_checker
            .get_or_default(|| FeatureManager::shared())
    }

    pub fn gate_keeper(&self) -> Arc<dyn GateKeeper> {
        self.gate_keeper
            .get_or_default(|| GateKeeperManager::shared())
    }

    pub fn event_logger(&self) -> Arc<dyn EventLogger> {
        self.event_logger.get_or_default(|| AppEvents::shared())
    }

    pub fn background_event_logger(&self) -> Arc<dyn BackgroundEventLogger> {
        self.background_event_logger
            .get_or_default(|| BackgroundRefreshLogger::shared())
    }

    pub fn persistent_store(&self) -> Arc<dyn PersistentStore> {
        self.persistent_store
            .get_or_default(|| UserDefaults::standard())
    }

    pub fn server_configuration_provider(&self) -> Arc<dyn ServerConfigurationProvider> {
        self.server_configuration_provider
            .get_or_default(|| ServerConfigurationManager::shared())
    }

    pub fn profile_provider(&self) -> Arc<dyn ProfileProvider> {
        self.profile_provider
            .get_or_default(|| ProfileManager::shared())
    }

    pub fn error_reporter(&self) -> Arc<dyn ErrorReporter> {
        self.error_reporter.get_or_default(|| ErrorReport::shared())
    }

    pub fn measurement_reporter(&self) -> Arc<dyn MeasurementReporter> {
        self.measurement_reporter
            .get_or_default(|| AemReporter::shared())
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    /// Whether `role` was replaced through [`DependencyContainer::configure`].
    pub fn is_overridden(&self, role: Role) -> bool {
        self.overrides.read().contains(&role)
    }

    /// Whether `role` currently holds a value (override or materialized default).
    pub fn is_materialized(&self, role: Role) -> bool {
        match role {
            Role::NotificationCenter => self.notification_center.is_set(),
            Role::TokenWallet => self.token_wallet.is_set(),
            Role::AuthenticationTokenWallet => self.authentication_token_wallet.is_set(),
            Role::Settings => self.settings.is_set(),
            Role::FeatureChecker => self.feature_checker.is_set(),
            Role::GateKeeper => self.gate_keeper.is_set(),
            Role::EventLogger => self.event_logger.is_set(),
            Role::BackgroundEventLogger => self.background_event_logger.is_set(),
            Role::PersistentStore => self.persistent_store.is_set(),
            Role::ServerConfigurationProvider => self.server_configuration_provider.is_set(),
            Role::ProfileProvider => self.profile_provider.is_set(),
            Role::ErrorReporter => self.error_reporter.is_set(),
            Role::MeasurementReporter => self.measurement_reporter.is_set(),
        }
    }

    /// Resolve every role, materializing defaults as needed.
    pub fn resolve_all(&self) -> ResolvedDependencies {
        ResolvedDependencies {
            notification_center: self.notification_center(),
            token_wallet: self.token_wallet(),
            authentication_token_wallet: self.authentication_token_wallet(),
            settings: self.settings(),
            feature_checker: self.feature_checker(),
            gate_keeper: self.gate_keeper(),
            event_logger: self.event_logger(),
            background_event_logger: self.background_event_logger(),
            persistent_store: self.persistent_store(),
            server_configuration_provider: self.server_configuration_provider(),
            profile_provider: self.profile_provider(),
            error_reporter: self.error_reporter(),
            measurement_reporter: self.measurement_reporter(),
        }
    }

    /// Drop every override and materialized default.
    ///
    /// Shared defaults this container resolved are returned to their initial
    /// state as well. The notification center is left alone: other contexts
    /// may hold subscriptions on it.
    pub fn reset(&self) {
        self.reset_shared_defaults();
        self.notification_center.clear();
        self.token_wallet.clear();
        self.authentication_token_wallet.clear();
        self.settings.clear();
        self.feature_checker.clear();
        self.gate_keeper.clear();
        self.event_logger.clear();
        self.background_event_logger.clear();
        self.persistent_store.clear();
        self.server_configuration_provider.clear();
        self.profile_provider.clear();
        self.error_reporter.clear();
        self.measurement_reporter.clear();
        self.overrides.write().clear();
        debug!("Dependency container reset");
    }

    fn reset_shared_defaults(&self) {
        let resolved_default = |role: Role| self.is_materialized(role) && !self.is_overridden(role);

        if resolved_default(Role::TokenWallet) {
            AccessTokenManager::shared().reset();
        }
        if resolved_default(Role::AuthenticationTokenWallet) {
            AuthenticationTokenManager::shared().reset();
        }
        if resolved_default(Role::Settings) {
            SdkSettings::shared().reset();
        }
        if resolved_default(Role::FeatureChecker) {
            FeatureManager::shared().reset();
        }
        if resolved_default(Role::GateKeeper) {
            GateKeeperManager::shared().reset();
        }
        if resolved_default(Role::EventLogger) {
            AppEvents::shared().reset();
        }
        if resolved_default(Role::PersistentStore) {
            UserDefaults::standard().clear();
        }
        if resolved_default(Role::ServerConfigurationProvider) {
            ServerConfigurationManager::shared().reset();
        }
        if resolved_default(Role::ProfileProvider) {
            ProfileManager::shared().reset();
        }
        if resolved_default(Role::ErrorReporter) {
            ErrorReport::shared().reset();
        }
        if resolved_default(Role::MeasurementReporter) {
            AemReporter::shared().reset();
        }
    }
}

/// Identity of the object behind a trait object, ignoring vtables.
pub fn same_instance<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
