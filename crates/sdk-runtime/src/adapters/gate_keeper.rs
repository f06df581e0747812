//! Default gate keeper backed by the gates carried in the server
//! configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;

use super::ports::GateKeeper;

lazy_static! {
    static ref SHARED: Arc<GateKeeperManager> = Arc::new(GateKeeperManager::new());
}

#[derive(Debug, Default)]
pub struct GateKeeperManager {
    gates: RwLock<BTreeMap<String, bool>>,
}

impl GateKeeperManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<GateKeeperManager> {
        Arc::clone(&SHARED)
    }

    /// Number of known gates.
    pub fn len(&self) -> usize {
        self.gates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.read().is_empty()
    }

    pub fn reset(&self) {
        self.gates.write().clear();
    }
}

impl GateKeeper for GateKeeperManager {
    fn bool_for_key(&self, key: &str, default: bool) -> bool {
        self.gates.read().get(key).copied().unwrap_or(default)
    }

    fn update(&self, gates: BTreeMap<String, bool>) {
        debug!(count = gates.len(), "Gate keepers updated");
        *self.gates.write() = gates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_gate_uses_default() {
        let gk = GateKeeperManager::new();
        assert!(gk.bool_for_key("missing", true));
        assert!(!gk.bool_for_key("missing", false));
    }

    #[test]
    fn test_update_replaces_gates() {
        let gk = GateKeeperManager::new();
        gk.update(BTreeMap::from([("a".to_string(), false)]));
        assert!(!gk.bool_for_key("a", true));
        gk.update(BTreeMap::new());
        assert!(gk.bool_for_key("a", true));
    }
}
