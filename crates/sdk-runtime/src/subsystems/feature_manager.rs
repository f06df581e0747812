//! # Feature Manager
//!
//! Default [`FeatureChecker`]. A feature is enabled when its whole parent
//! chain is enabled, none of the chain was disabled locally, and the gate
//! keeper allows it (falling back to the feature's default when the gate is
//! unknown).
//!
//! ```text
//! Aem ──→ AppEvents ──→ Core
//!  │          │           │
//!  └──────────┴───────────┴── each must pass: not disabled, gate open
//! ```
//!
//! Before it is configured the manager answers from feature defaults alone.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use sdk_types::Feature;
use tracing::info;

use super::{ConfigurableSubsystem, SubsystemError, SubsystemId, SubsystemWiring};
use crate::adapters::{FeatureChecker, GateKeeper, PersistentStore, Settings};

lazy_static! {
    static ref SHARED: Arc<FeatureManager> = Arc::new(FeatureManager::new());
}

const DISABLED_KEY_PREFIX: &str = "com.facebook.sdk:FBSDKFeatureManager.";

#[derive(Clone)]
struct FeatureWiring {
    gate_keeper: Arc<dyn GateKeeper>,
    settings: Arc<dyn Settings>,
    store: Arc<dyn PersistentStore>,
}

#[derive(Default)]
pub struct FeatureManager {
    wiring: RwLock<Option<FeatureWiring>>,
}

impl FeatureManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<FeatureManager> {
        Arc::clone(&SHARED)
    }

    pub fn gate_keeper(&self) -> Option<Arc<dyn GateKeeper>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.gate_keeper))
    }

    pub fn settings(&self) -> Option<Arc<dyn Settings>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.settings))
    }

    pub fn store(&self) -> Option<Arc<dyn PersistentStore>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.store))
    }

    /// Store key marking `feature` as locally disabled.
    pub fn disabled_key(feature: Feature) -> String {
        format!("{DISABLED_KEY_PREFIX}{}", feature.gate_key())
    }

    /// Disable `feature` (and everything beneath it) until the flag is cleared.
    /// No effect before configuration.
    pub fn disable_feature(&self, feature: Feature) {
        if let Some(wiring) = self.wiring.read().as_ref() {
            info!(feature = feature.name(), "Feature disabled locally");
            wiring.store.set_integer(&Self::disabled_key(feature), 1);
        }
    }

    fn is_single_enabled(wiring: Option<&FeatureWiring>, feature: Feature) -> bool {
        match wiring {
            None => feature.enabled_by_default(),
            Some(w) => {
                let disabled = w.store.integer(&Self::disabled_key(feature)) == Some(1);
                !disabled
                    && w
                        .gate_keeper
                        .bool_for_key(&feature.gate_key(), feature.enabled_by_default())
            }
        }
    }
}

impl FeatureChecker for FeatureManager {
    fn is_enabled(&self, feature: Feature) -> bool {
        let wiring = self.wiring.read().clone();
        let mut current = Some(feature);
        while let Some(f) = current {
            if !Self::is_single_enabled(wiring.as_ref(), f) {
                return false;
            }
            current = f.parent();
        }
        true
    }
}

impl ConfigurableSubsystem for FeatureManager {
    fn id(&self) -> SubsystemId {
        SubsystemId::FeatureManager
    }

    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError> {
        let deps = wiring.dependencies;
        *self.wiring.write() = Some(FeatureWiring {
            gate_keeper: Arc::clone(&deps.gate_keeper),
            settings: Arc::clone(&deps.settings),
            store: Arc::clone(&deps.persistent_store),
        });
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.wiring.read().is_some()
    }

    fn reset(&self) {
        *self.wiring.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{GateKeeperManager, SdkSettings, UserDefaults};
    use crate::container::SdkConfig;
    use std::collections::BTreeMap;

    fn configured() -> (FeatureManager, Arc<GateKeeperManager>) {
        let manager = FeatureManager::new();
        let gk = Arc::new(GateKeeperManager::new());
        *manager.wiring.write() = Some(FeatureWiring {
            gate_keeper: gk.clone(),
            settings: Arc::new(SdkSettings::from_config(&SdkConfig::default())),
            store: Arc::new(UserDefaults::new()),
        });
        (manager, gk)
    }

    #[test]
    fn test_unconfigured_uses_defaults() {
        let manager = FeatureManager::new();
        assert!(manager.is_enabled(Feature::Core));
        assert!(manager.is_enabled(Feature::AppEvents));
        assert!(!manager.is_enabled(Feature::Aem));
    }

    #[test]
    fn test_gate_opens_default_off_feature() {
        let (manager, gk) = configured();
        gk.update(BTreeMap::from([(Feature::Aem.gate_key(), true)]));
        assert!(manager.is_enabled(Feature::Aem));
    }

    #[test]
    fn test_closed_parent_disables_child() {
        let (manager, gk) = configured();
        gk.update(BTreeMap::from([
            (Feature::Aem.gate_key(), true),
            (Feature::AppEvents.gate_key(), false),
        ]));
        assert!(!manager.is_enabled(Feature::Aem));
    }

    #[test]
    fn test_locally_disabled_feature() {
        let (manager, _) = configured();
        manager.disable_feature(Feature::Instrument);
        assert!(!manager.is_enabled(Feature::CrashReport));
        assert!(manager.is_enabled(Feature::AppEvents));
    }
}
