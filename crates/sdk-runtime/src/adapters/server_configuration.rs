//! # Server Configuration Manager
//!
//! Default [`ServerConfigurationProvider`]. A load never blocks the caller:
//! inside a Tokio runtime the completion runs on a spawned task, outside one
//! it runs inline with the cached value.
//!
//! The fetch transport is not part of this crate. Loads resolve to the cached
//! configuration, which starts as the built-in fallback and is replaced via
//! [`ServerConfigurationManager::store`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;

use super::gate_keeper::GateKeeperManager;
use super::ports::{
    GateKeeper, ServerConfiguration, ServerConfigurationCompletion, ServerConfigurationProvider,
};

lazy_static! {
    static ref SHARED: Arc<ServerConfigurationManager> = Arc::new(
        ServerConfigurationManager::new(GateKeeperManager::shared())
    );
}

pub struct ServerConfigurationManager {
    cached: RwLock<ServerConfiguration>,
    gate_keeper: Arc<dyn GateKeeper>,
    loads_started: AtomicU64,
}

impl ServerConfigurationManager {
    pub fn new(gate_keeper: Arc<dyn GateKeeper>) -> Self {
        Self {
            cached: RwLock::new(ServerConfiguration::fallback(None)),
            gate_keeper,
            loads_started: AtomicU64::new(0),
        }
    }

    pub fn shared() -> Arc<ServerConfigurationManager> {
        Arc::clone(&SHARED)
    }

    /// Replace the cached configuration and push its gates to the gate keeper.
    pub fn store(&self, configuration: ServerConfiguration) {
        self.gate_keeper.update(configuration.gate_keepers.clone());
        *self.cached.write() = configuration;
    }

    pub fn loads_started(&self) -> u64 {
        self.loads_started.load(Ordering::SeqCst)
    }

    /// Back to the built-in fallback with no loads counted.
    pub fn reset(&self) {
        *self.cached.write() = ServerConfiguration::fallback(None);
        self.loads_started.store(0, Ordering::SeqCst);
    }
}

impl ServerConfigurationProvider for ServerConfigurationManager {
    fn cached_server_configuration(&self) -> ServerConfiguration {
        self.cached.read().clone()
    }

    fn load_server_configuration(&self, completion: Option<ServerConfigurationCompletion>) {
        let load = self.loads_started.fetch_add(1, Ordering::SeqCst) + 1;
        let configuration = self.cached_server_configuration();
        debug!(load, is_default = configuration.is_default, "Server configuration load started");

        let Some(completion) = completion else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    completion(Ok(configuration));
                });
            }
            Err(_) => completion(Ok(configuration)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_load_without_runtime_completes_inline() {
        let manager = ServerConfigurationManager::new(Arc::new(GateKeeperManager::new()));
        let (tx, rx) = std::sync::mpsc::channel();
        manager.load_server_configuration(Some(Box::new(move |result| {
            tx.send(result).unwrap();
        })));
        let config = rx.try_recv().unwrap().unwrap();
        assert!(config.is_default);
        assert_eq!(manager.loads_started(), 1);
    }

    #[tokio::test]
    async fn test_load_inside_runtime_completes_on_task() {
        let manager = ServerConfigurationManager::new(Arc::new(GateKeeperManager::new()));
        let (tx, rx) = tokio::sync::oneshot::channel();
        manager.load_server_configuration(Some(Box::new(move |result| {
            let _ = tx.send(result);
        })));
        let config = rx.await.unwrap().unwrap();
        assert!(config.is_default);
    }

    #[test]
    fn test_store_updates_gate_keeper() {
        let gk = Arc::new(GateKeeperManager::new());
        let manager = ServerConfigurationManager::new(gk.clone());
        manager.store(ServerConfiguration {
            app_id: Some("1".into()),
            implicit_logging_enabled: true,
            gate_keepers: BTreeMap::from([("FBSDKFeatureAEM".to_string(), true)]),
            is_default: false,
        });
        assert!(gk.bool_for_key("FBSDKFeatureAEM", false));
        assert!(!manager.cached_server_configuration().is_default);
    }

    #[test]
    fn test_load_without_completion_is_counted() {
        let manager = ServerConfigurationManager::new(Arc::new(GateKeeperManager::new()));
        manager.load_server_configuration(None);
        assert_eq!(manager.loads_started(), 1);
    }
}
