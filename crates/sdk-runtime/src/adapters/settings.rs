//! Default SDK settings.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use super::ports::Settings;
use crate::container::SdkConfig;

lazy_static! {
    static ref SHARED: Arc<SdkSettings> = Arc::new(SdkSettings::from_config(&SdkConfig::default()));
}

/// Process-wide settings seeded from an [`SdkConfig`].
#[derive(Debug)]
pub struct SdkSettings {
    app_id: RwLock<Option<String>>,
    graph_api_version: RwLock<String>,
    auto_log_app_events: AtomicBool,
}

impl SdkSettings {
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            app_id: RwLock::new(config.app_id.clone()),
            graph_api_version: RwLock::new(config.graph_api_version.clone()),
            auto_log_app_events: AtomicBool::new(config.auto_log_app_events),
        }
    }

    /// The process-wide default instance.
    pub fn shared() -> Arc<SdkSettings> {
        Arc::clone(&SHARED)
    }

    pub fn set_app_id(&self, app_id: Option<String>) {
        *self.app_id.write() = app_id;
    }

    pub fn set_graph_api_version(&self, version: impl Into<String>) {
        *self.graph_api_version.write() = version.into();
    }

    pub fn set_auto_log_app_events_enabled(&self, enabled: bool) {
        self.auto_log_app_events.store(enabled, Ordering::SeqCst);
    }

    /// Restore the values of a default [`SdkConfig`].
    pub fn reset(&self) {
        let defaults = SdkConfig::default();
        self.set_app_id(defaults.app_id);
        self.set_graph_api_version(defaults.graph_api_version);
        self.set_auto_log_app_events_enabled(defaults.auto_log_app_events);
    }
}

impl Settings for SdkSettings {
    fn app_id(&self) -> Option<String> {
        self.app_id.read().clone()
    }

    fn graph_api_version(&self) -> String {
        self.graph_api_version.read().clone()
    }

    fn is_auto_log_app_events_enabled(&self) -> bool {
        self.auto_log_app_events.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_from_config() {
        let config = SdkConfig {
            app_id: Some("123".into()),
            ..SdkConfig::default()
        };
        let settings = SdkSettings::from_config(&config);
        assert_eq!(settings.app_id().as_deref(), Some("123"));
        assert_eq!(settings.graph_api_version(), config.graph_api_version);
        assert!(settings.is_auto_log_app_events_enabled());
    }

    #[test]
    fn test_setters_replace_values() {
        let settings = SdkSettings::from_config(&SdkConfig::default());
        settings.set_app_id(Some("42".into()));
        settings.set_auto_log_app_events_enabled(false);
        assert_eq!(settings.app_id().as_deref(), Some("42"));
        assert!(!settings.is_auto_log_app_events_enabled());
    }

    #[test]
    fn test_shared_is_single_instance() {
        assert!(Arc::ptr_eq(&SdkSettings::shared(), &SdkSettings::shared()));
    }
}
