//! On-device model manager. Downloading and evaluating models is outside this
//! crate; the manager only holds the collaborators it needs for that.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use super::{
    ConfigurableSubsystem, GraphRequestFactory, SubsystemError, SubsystemId, SubsystemWiring,
};
use crate::adapters::{FeatureChecker, GateKeeper, PersistentStore, Settings};

lazy_static! {
    static ref SHARED: Arc<ModelManager> = Arc::new(ModelManager::new());
}

#[derive(Clone)]
struct ModelWiring {
    feature_checker: Arc<dyn FeatureChecker>,
    request_factory: Arc<GraphRequestFactory>,
    store: Arc<dyn PersistentStore>,
    settings: Arc<dyn Settings>,
    gate_keeper: Arc<dyn GateKeeper>,
    directory: PathBuf,
}

#[derive(Default)]
pub struct ModelManager {
    wiring: RwLock<Option<ModelWiring>>,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<ModelManager> {
        Arc::clone(&SHARED)
    }

    pub fn feature_checker(&self) -> Option<Arc<dyn FeatureChecker>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.feature_checker))
    }

    pub fn request_factory(&self) -> Option<Arc<GraphRequestFactory>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.request_factory))
    }

    pub fn store(&self) -> Option<Arc<dyn PersistentStore>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.store))
    }

    pub fn settings(&self) -> Option<Arc<dyn Settings>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.settings))
    }

    pub fn gate_keeper(&self) -> Option<Arc<dyn GateKeeper>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.gate_keeper))
    }

    pub fn directory(&self) -> Option<PathBuf> {
        self.wiring.read().as_ref().map(|w| w.directory.clone())
    }

    /// Location of the model file `name` inside the configured directory.
    pub fn model_path(&self, name: &str) -> Option<PathBuf> {
        self.directory().map(|dir| dir.join(format!("{name}.model")))
    }
}

fn is_usable_directory(dir: &Path) -> bool {
    !dir.as_os_str().is_empty() && dir.file_name().is_some()
}

impl ConfigurableSubsystem for ModelManager {
    fn id(&self) -> SubsystemId {
        SubsystemId::ModelManager
    }

    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError> {
        let directory = &wiring.config.model_directory;
        if !is_usable_directory(directory) {
            return Err(SubsystemError::invalid_configuration(
                SubsystemId::ModelManager,
                format!("unusable model directory `{}`", directory.display()),
            ));
        }

        let deps = wiring.dependencies;
        *self.wiring.write() = Some(ModelWiring {
            feature_checker: Arc::clone(&deps.feature_checker),
            request_factory: Arc::clone(wiring.request_factory),
            store: Arc::clone(&deps.persistent_store),
            settings: Arc::clone(&deps.settings),
            gate_keeper: Arc::clone(&deps.gate_keeper),
            directory: directory.clone(),
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
