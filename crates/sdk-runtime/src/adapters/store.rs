//! In-memory persistent store.
//!
//! Values are held as JSON so integer and string reads of the same key behave
//! like a platform preference store: a read of the wrong shape yields `None`.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde_json::Value;

use super::ports::PersistentStore;

lazy_static! {
    static ref STANDARD: Arc<UserDefaults> = Arc::new(UserDefaults::new());
}

#[derive(Debug, Default)]
pub struct UserDefaults {
    values: RwLock<HashMap<String, Value>>,
}

impl UserDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store.
    pub fn standard() -> Arc<UserDefaults> {
        Arc::clone(&STANDARD)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }
}

impl PersistentStore for UserDefaults {
    fn integer(&self, key: &str) -> Option<i64> {
        self.values.read().get(key).and_then(Value::as_i64)
    }

    fn set_integer(&self, key: &str, value: i64) {
        self.values.write().insert(key.to_string(), Value::from(value));
    }

    fn string(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), Value::from(value));
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}
