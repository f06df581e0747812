//! Test doubles shared by the integration tests.
//!
//! Every double records what it was asked to do. Doubles that take part in
//! ordering assertions also append to a shared [`CallLog`].

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lifecycle_bus::InMemoryNotificationCenter;
use parking_lot::Mutex;
use sdk_runtime::adapters::{
    AccessTokenWallet, AuthenticationTokenWallet, BackgroundEventLogger, ErrorReporter,
    EventLogger, EventParameters, FeatureChecker, MeasurementReporter, PersistentStore,
    ProfileProvider, ServerConfiguration, ServerConfigurationCompletion,
    ServerConfigurationProvider, Settings,
};
use sdk_runtime::container::{DependencySet, SdkConfig};
use sdk_runtime::subsystems::Subsystems;
use sdk_runtime::{
    ApplicationDelegate, ApplicationObserver, DidBecomeActiveListener,
    DidEnterBackgroundListener, DidFinishLaunchingListener, OpenUrlListener,
    WillResignActiveListener,
};
use sdk_types::{
    AccessToken, AppUrl, AuthenticationToken, BackgroundRefreshStatus, Feature, LaunchContext,
    OpenUrlOptions, Profile,
};

/// Ordered record of calls across several doubles.
#[derive(Default)]
pub struct CallLog {
    entries: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries.lock().iter().position(|e| e == entry)
    }
}

// =============================================================================
// PLATFORM
// =============================================================================

pub struct TestSettings {
    pub auto_log_app_events: AtomicBool,
}

impl TestSettings {
    pub fn new(auto_log_app_events: bool) -> Self {
        Self {
            auto_log_app_events: AtomicBool::new(auto_log_app_events),
        }
    }
}

impl Settings for TestSettings {
    fn app_id(&self) -> Option<String> {
        Some("123".to_string())
    }

    fn graph_api_version(&self) -> String {
        "v13.0".to_string()
    }

    fn is_auto_log_app_events_enabled(&self) -> bool {
        self.auto_log_app_events.load(Ordering::SeqCst)
    }
}

pub struct TestFeatureChecker {
    log: Arc<CallLog>,
    enabled: Mutex<HashSet<Feature>>,
    checked: Mutex<Vec<Feature>>,
}

impl TestFeatureChecker {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            enabled: Mutex::new(HashSet::new()),
            checked: Mutex::new(Vec::new()),
        }
    }

    pub fn enable(&self, feature: Feature) {
        self.enabled.lock().insert(feature);
    }

    pub fn checked(&self) -> Vec<Feature> {
        self.checked.lock().clone()
    }

    pub fn check_count(&self, feature: Feature) -> usize {
        self.checked.lock().iter().filter(|f| **f == feature).count()
    }

    pub fn clear_checks(&self) {
        self.checked.lock().clear();
    }
}

impl FeatureChecker for TestFeatureChecker {
    fn is_enabled(&self, feature: Feature) -> bool {
        self.log.record(format!("feature_check:{}", feature.name()));
        self.checked.lock().push(feature);
        self.enabled.lock().contains(&feature)
    }
}

/// Store that records every integer write.
#[derive(Default)]
pub struct UserDefaultsSpy {
    integers: Mutex<HashMap<String, i64>>,
    strings: Mutex<HashMap<String, String>>,
    integer_writes: Mutex<Vec<(String, i64)>>,
    read_delay: Option<Duration>,
}

impl UserDefaultsSpy {
    pub fn with_integer(key: &str, value: i64) -> Self {
        let spy = Self::default();
        spy.integers.lock().insert(key.to_string(), value);
        spy
    }

    /// Stall every integer read, widening check-then-write windows.
    pub fn with_slow_reads(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn integer_writes(&self) -> Vec<(String, i64)> {
        self.integer_writes.lock().clone()
    }
}

impl PersistentStore for UserDefaultsSpy {
    fn integer(&self, key: &str) -> Option<i64> {
        let value = self.integers.lock().get(key).copied();
        if let Some(delay) = self.read_delay {
            std::thread::sleep(delay);
        }
        value
    }

    fn set_integer(&self, key: &str, value: i64) {
        self.integer_writes.lock().push((key.to_string(), value));
        self.integers.lock().insert(key.to_string(), value);
    }

    fn string(&self, key: &str) -> Option<String> {
        self.strings.lock().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        self.strings.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.integers.lock().remove(key);
        self.strings.lock().remove(key);
    }
}

#[derive(Default)]
pub struct TestServerConfigurationProvider {
    pub loads: AtomicUsize,
}

impl ServerConfigurationProvider for TestServerConfigurationProvider {
    fn cached_server_configuration(&self) -> ServerConfiguration {
        ServerConfiguration::fallback(Some("123".to_string()))
    }

    fn load_server_configuration(&self, completion: Option<ServerConfigurationCompletion>) {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(completion) = completion {
            completion(Ok(self.cached_server_configuration()));
        }
    }
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub parameters: EventParameters,
    pub is_implicitly_logged: bool,
}

#[derive(Default)]
pub struct TestAppEvents {
    pub observing_lifecycle: AtomicUsize,
    pub auto_reset_registrations: AtomicUsize,
    pub activations: AtomicUsize,
    source: Mutex<Option<(Option<String>, Option<AppUrl>)>>,
    events: Mutex<Vec<RecordedEvent>>,
}

impl TestAppEvents {
    pub fn source_application(&self) -> Option<String> {
        self.source.lock().as_ref().and_then(|(app, _)| app.clone())
    }

    pub fn source_url(&self) -> Option<AppUrl> {
        self.source.lock().as_ref().and_then(|(_, url)| url.clone())
    }

    pub fn was_source_set(&self) -> bool {
        self.source.lock().is_some()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn events_named(&self, name: &str) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }
}

impl EventLogger for TestAppEvents {
    fn start_observing_application_lifecycle_notifications(&self) {
        self.observing_lifecycle.fetch_add(1, Ordering::SeqCst);
    }

    fn register_auto_reset_source_application(&self) {
        self.auto_reset_registrations.fetch_add(1, Ordering::SeqCst);
    }

    fn set_source_application(&self, source_application: Option<&str>, url: Option<&AppUrl>) {
        *self.source.lock() = Some((source_application.map(str::to_string), url.cloned()));
    }

    fn activate_app(&self) {
        self.activations.fetch_add(1, Ordering::SeqCst);
    }

    fn log_internal_event(&self, name: &str, parameters: EventParameters, is_implicitly_logged: bool) {
        self.events.lock().push(RecordedEvent {
            name: name.to_string(),
            parameters,
            is_implicitly_logged,
        });
    }
}

#[derive(Default)]
pub struct TestBackgroundEventLogger {
    statuses: Mutex<Vec<BackgroundRefreshStatus>>,
}

impl TestBackgroundEventLogger {
    pub fn statuses(&self) -> Vec<BackgroundRefreshStatus> {
        self.statuses.lock().clone()
    }
}

impl BackgroundEventLogger for TestBackgroundEventLogger {
    fn log_background_refresh_status(&self, status: BackgroundRefreshStatus) {
        self.statuses.lock().push(status);
    }
}

#[derive(Default)]
pub struct TestErrorReporter {
    errors: Mutex<Vec<(i64, String, String)>>,
}

impl TestErrorReporter {
    pub fn errors(&self) -> Vec<(i64, String, String)> {
        self.errors.lock().clone()
    }
}

impl ErrorReporter for TestErrorReporter {
    fn save_error(&self, code: i64, domain: &str, message: &str) {
        self.errors
            .lock()
            .push((code, domain.to_string(), message.to_string()));
    }
}

pub struct TestMeasurementReporter {
    log: Arc<CallLog>,
    pub enabled: AtomicBool,
    urls: Mutex<Vec<AppUrl>>,
}

impl TestMeasurementReporter {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            enabled: AtomicBool::new(false),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<AppUrl> {
        self.urls.lock().clone()
    }
}

impl MeasurementReporter for TestMeasurementReporter {
    fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn handle_url(&self, url: &AppUrl) {
        self.log.record("measurement:handle_url");
        self.urls.lock().push(url.clone());
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

#[derive(Default)]
pub struct TestTokenWallet {
    cached: Mutex<Option<AccessToken>>,
    current: Mutex<Option<AccessToken>>,
}

impl TestTokenWallet {
    pub fn with_cached(token: AccessToken) -> Self {
        let wallet = Self::default();
        *wallet.cached.lock() = Some(token);
        wallet
    }
}

impl AccessTokenWallet for TestTokenWallet {
    fn cached_token(&self) -> Option<AccessToken> {
        self.cached.lock().clone()
    }

    fn current(&self) -> Option<AccessToken> {
        self.current.lock().clone()
    }

    fn set_current(&self, token: Option<AccessToken>) {
        *self.current.lock() = token;
    }
}

#[derive(Default)]
pub struct TestAuthenticationTokenWallet {
    cached: Mutex<Option<AuthenticationToken>>,
    current: Mutex<Option<AuthenticationToken>>,
}

impl TestAuthenticationTokenWallet {
    pub fn with_cached(token: AuthenticationToken) -> Self {
        let wallet = Self::default();
        *wallet.cached.lock() = Some(token);
        wallet
    }
}

impl AuthenticationTokenWallet for TestAuthenticationTokenWallet {
    fn cached_token(&self) -> Option<AuthenticationToken> {
        self.cached.lock().clone()
    }

    fn current(&self) -> Option<AuthenticationToken> {
        self.current.lock().clone()
    }

    fn set_current(&self, token: Option<AuthenticationToken>) {
        *self.current.lock() = token;
    }
}

/// Profile provider with a stubbed cache.
#[derive(Default)]
pub struct TestProfileProvider {
    cached: Mutex<Option<Profile>>,
    current: Mutex<Option<Profile>>,
    pub set_current_calls: AtomicUsize,
}

impl TestProfileProvider {
    pub fn stub_cached(&self, profile: Option<Profile>) {
        *self.cached.lock() = profile;
    }
}

impl ProfileProvider for TestProfileProvider {
    fn fetch_cached_profile(&self) -> Option<Profile> {
        self.cached.lock().clone()
    }

    fn current(&self) -> Option<Profile> {
        self.current.lock().clone()
    }

    fn set_current(&self, profile: Option<Profile>) {
        self.set_current_calls.fetch_add(1, Ordering::SeqCst);
        *self.current.lock() = profile;
    }
}

// =============================================================================
// OBSERVERS
// =============================================================================

/// Observer implementing every capability and recording each callback.
pub struct TestObserver {
    name: &'static str,
    log: Arc<CallLog>,
    handles_launch: bool,
    handles_url: bool,
}

impl TestObserver {
    pub fn new(name: &'static str, log: Arc<CallLog>) -> Self {
        Self {
            name,
            log,
            handles_launch: false,
            handles_url: false,
        }
    }

    pub fn handling(mut self) -> Self {
        self.handles_launch = true;
        self.handles_url = true;
        self
    }

    fn record(&self, callback: &str) {
        self.log.record(format!("{}:{}", self.name, callback));
    }
}

impl DidFinishLaunchingListener for TestObserver {
    fn application_did_finish_launching(&self, _launch: &LaunchContext) -> bool {
        self.record("did_finish_launching");
        self.handles_launch
    }
}

impl DidBecomeActiveListener for TestObserver {
    fn application_did_become_active(&self) {
        self.record("did_become_active");
    }
}

impl WillResignActiveListener for TestObserver {
    fn application_will_resign_active(&self) {
        self.record("will_resign_active");
    }
}

impl DidEnterBackgroundListener for TestObserver {
    fn application_did_enter_background(&self) {
        self.record("did_enter_background");
    }
}

impl OpenUrlListener for TestObserver {
    fn application_open_url(&self, _url: &AppUrl, _options: &OpenUrlOptions) -> bool {
        self.record("open_url");
        self.handles_url
    }
}

impl ApplicationObserver for TestObserver {
    fn as_did_finish_launching(&self) -> Option<&dyn DidFinishLaunchingListener> {
        Some(self)
    }

    fn as_did_become_active(&self) -> Option<&dyn DidBecomeActiveListener> {
        Some(self)
    }

    fn as_will_resign_active(&self) -> Option<&dyn WillResignActiveListener> {
        Some(self)
    }

    fn as_did_enter_background(&self) -> Option<&dyn DidEnterBackgroundListener> {
        Some(self)
    }

    fn as_open_url(&self) -> Option<&dyn OpenUrlListener> {
        Some(self)
    }
}

/// Observer that only cares about resigning active.
#[derive(Default)]
pub struct ResignOnlyObserver {
    pub calls: AtomicUsize,
}

impl WillResignActiveListener for ResignOnlyObserver {
    fn application_will_resign_active(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl ApplicationObserver for ResignOnlyObserver {
    fn as_will_resign_active(&self) -> Option<&dyn WillResignActiveListener> {
        Some(self)
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// A full set of doubles plus an isolated context wired to them.
pub struct TestHarness {
    pub log: Arc<CallLog>,
    pub center: Arc<InMemoryNotificationCenter>,
    pub settings: Arc<TestSettings>,
    pub feature_checker: Arc<TestFeatureChecker>,
    pub events: Arc<TestAppEvents>,
    pub background_events: Arc<TestBackgroundEventLogger>,
    pub store: Arc<UserDefaultsSpy>,
    pub server_configuration: Arc<TestServerConfigurationProvider>,
    pub profiles: Arc<TestProfileProvider>,
    pub token_wallet: Arc<TestTokenWallet>,
    pub authentication_wallet: Arc<TestAuthenticationTokenWallet>,
    pub error_reporter: Arc<TestErrorReporter>,
    pub measurement: Arc<TestMeasurementReporter>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::with_store(UserDefaultsSpy::default())
    }
}

impl TestHarness {
    pub fn with_store(store: UserDefaultsSpy) -> Self {
        let log = Arc::new(CallLog::default());
        Self {
            center: Arc::new(InMemoryNotificationCenter::new()),
            settings: Arc::new(TestSettings::new(false)),
            feature_checker: Arc::new(TestFeatureChecker::new(log.clone())),
            events: Arc::new(TestAppEvents::default()),
            background_events: Arc::new(TestBackgroundEventLogger::default()),
            store: Arc::new(store),
            server_configuration: Arc::new(TestServerConfigurationProvider::default()),
            profiles: Arc::new(TestProfileProvider::default()),
            token_wallet: Arc::new(TestTokenWallet::default()),
            authentication_wallet: Arc::new(TestAuthenticationTokenWallet::default()),
            error_reporter: Arc::new(TestErrorReporter::default()),
            measurement: Arc::new(TestMeasurementReporter::new(log.clone())),
            log,
        }
    }

    pub fn dependency_set(&self) -> DependencySet {
        DependencySet::new()
            .with_notification_center(self.center.clone())
            .with_token_wallet(self.token_wallet.clone())
            .with_authentication_token_wallet(self.authentication_wallet.clone())
            .with_settings(self.settings.clone())
            .with_feature_checker(self.feature_checker.clone())
            .with_event_logger(self.events.clone())
            .with_background_event_logger(self.background_events.clone())
            .with_persistent_store(self.store.clone())
            .with_server_configuration_provider(self.server_configuration.clone())
            .with_profile_provider(self.profiles.clone())
            .with_error_reporter(self.error_reporter.clone())
            .with_measurement_reporter(self.measurement.clone())
    }

    /// A context over these doubles with private subsystem instances.
    pub fn delegate(&self) -> ApplicationDelegate {
        self.delegate_with_config(SdkConfig::default())
    }

    pub fn delegate_with_config(&self, config: SdkConfig) -> ApplicationDelegate {
        ApplicationDelegate::builder()
            .dependencies(self.dependency_set())
            .config(config)
            .subsystems(Subsystems::default())
            .build()
    }
}

/// Launch options from key/value pairs.
pub fn launch_options(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}
