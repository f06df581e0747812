//! # Platform Ports
//!
//! Settings, feature gating, persistent storage and the server
//! configuration provider.

use std::collections::BTreeMap;

use sdk_types::{Feature, SdkError};
use serde::{Deserialize, Serialize};

/// SDK-wide settings.
pub trait Settings: Send + Sync {
    fn app_id(&self) -> Option<String>;
    fn graph_api_version(&self) -> String;
    fn is_auto_log_app_events_enabled(&self) -> bool;
}

/// Feature gate consulted before gated behavior.
pub trait FeatureChecker: Send + Sync {
    fn is_enabled(&self, feature: Feature) -> bool;
}

/// Server-driven boolean switches.
pub trait GateKeeper: Send + Sync {
    /// Value of `key`, or `default` when the gate is unknown.
    fn bool_for_key(&self, key: &str, default: bool) -> bool;

    /// Replace the known gates (fed from the server configuration).
    fn update(&self, gates: BTreeMap<String, bool>);
}

/// Persistent key-value storage.
///
/// Integer reads of absent keys return `None`; callers that treat absence as
/// zero do so explicitly.
pub trait PersistentStore: Send + Sync {
    fn integer(&self, key: &str) -> Option<i64>;
    fn set_integer(&self, key: &str, value: i64);
    fn string(&self, key: &str) -> Option<String>;
    fn set_string(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Server-side application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfiguration {
    pub app_id: Option<String>,
    pub implicit_logging_enabled: bool,
    pub gate_keepers: BTreeMap<String, bool>,
    /// `true` while this is the built-in fallback rather than a fetched value.
    pub is_default: bool,
}

impl ServerConfiguration {
    /// The built-in configuration used until a fetch completes.
    pub fn fallback(app_id: Option<String>) -> Self {
        Self {
            app_id,
            implicit_logging_enabled: false,
            gate_keepers: BTreeMap::new(),
            is_default: true,
        }
    }
}

/// Completion invoked once a server configuration load finishes.
pub type ServerConfigurationCompletion =
    Box<dyn FnOnce(Result<ServerConfiguration, SdkError>) + Send + 'static>;

/// Loader of the server configuration.
pub trait ServerConfigurationProvider: Send + Sync {
    /// Configuration currently cached.
    fn cached_server_configuration(&self) -> ServerConfiguration;

    /// Start loading the configuration. Must not block the caller.
    fn load_server_configuration(&self, completion: Option<ServerConfigurationCompletion>);
}
