//! App link utility. Knows which URL schemes belong to the host app and holds
//! the collaborators deferred app link fetching uses.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use sdk_types::AppUrl;

use super::{
    ConfigurableSubsystem, GraphRequestFactory, SubsystemError, SubsystemId, SubsystemWiring,
};
use crate::adapters::{EventLogger, Settings};
use crate::container::SdkConfig;

lazy_static! {
    static ref SHARED: Arc<AppLinkUtility> = Arc::new(AppLinkUtility::new());
}

/// Static information about the host application bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleInfo {
    pub app_id: Option<String>,
    pub url_schemes: Vec<String>,
}

impl BundleInfo {
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            app_id: config.app_id.clone(),
            url_schemes: config.url_schemes.clone(),
        }
    }

    /// Schemes the app answers to: the declared ones plus `fb<app id>`.
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self
            .url_schemes
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if let Some(app_id) = &self.app_id {
            let own = format!("fb{app_id}");
            if !schemes.contains(&own) {
                schemes.push(own);
            }
        }
        schemes
    }
}

#[derive(Clone)]
struct AppLinkWiring {
    request_factory: Arc<GraphRequestFactory>,
    bundle_info: BundleInfo,
    settings: Arc<dyn Settings>,
    event_logger: Arc<dyn EventLogger>,
}

#[derive(Default)]
pub struct AppLinkUtility {
    wiring: RwLock<Option<AppLinkWiring>>,
}

impl AppLinkUtility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<AppLinkUtility> {
        Arc::clone(&SHARED)
    }

    pub fn request_factory(&self) -> Option<Arc<GraphRequestFactory>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.request_factory))
    }

    pub fn bundle_info(&self) -> Option<BundleInfo> {
        self.wiring.read().as_ref().map(|w| w.bundle_info.clone())
    }

    pub fn settings(&self) -> Option<Arc<dyn Settings>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.settings))
    }

    pub fn event_logger(&self) -> Option<Arc<dyn EventLogger>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.event_logger))
    }

    /// Whether `url` uses one of the host app's schemes. `false` before
    /// configuration.
    pub fn is_matching_scheme(&self, url: &AppUrl) -> bool {
        let scheme = url.scheme();
        self.bundle_info()
            .is_some_and(|info| info.schemes().iter().any(|s| *s == scheme))
    }
}

impl ConfigurableSubsystem for AppLinkUtility {
    fn id(&self) -> SubsystemId {
        SubsystemId::AppLinkUtility
    }

    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError> {
        let deps = wiring.dependencies;
        *self.wiring.write() = Some(AppLinkWiring {
            request_factory: Arc::clone(wiring.request_factory),
            bundle_info: BundleInfo::from_config(wiring.config),
            settings: Arc::clone(&deps.settings),
            event_logger: Arc::clone(&deps.event_logger),
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
