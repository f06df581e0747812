//! # SDK Subsystems
//!
//! Internal subsystems that receive their collaborators during bootstrap.
//! Each one exposes a single configuration entry point through
//! [`ConfigurableSubsystem`].
//!
//! ## Configuration Order
//!
//! ```text
//! 1. ErrorDomain        ← error reporter
//! 2. ModelManager       ← feature checker, request factory, store, settings, gate keeper
//! 3. GraphRequestFactory← token wallet, settings
//! 4. FeatureManager     ← gate keeper, settings, store
//! 5. InstrumentManager  ← feature checker, settings, error reporter, crash handler
//! 6. AppLinkUtility     ← request factory, bundle info, settings, event logger
//! ```
//!
//! Later subsystems may read state of earlier ones; a failure in one does not
//! stop the others.

pub mod app_link;
pub mod error_domain;
pub mod feature_manager;
pub mod graph_request;
pub mod instrument;
pub mod model_manager;

pub use app_link::{AppLinkUtility, BundleInfo};
pub use error_domain::ErrorDomain;
pub use feature_manager::FeatureManager;
pub use graph_request::{GraphRequest, GraphRequestFactory};
pub use instrument::{CrashHandler, CrashObserver, InstrumentManager};
pub use model_manager::ModelManager;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::container::{ResolvedDependencies, SdkConfig};

// =============================================================================
// IDENTITY
// =============================================================================

/// Subsystems configured by the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemId {
    ErrorDomain,
    ModelManager,
    GraphRequest,
    FeatureManager,
    InstrumentManager,
    AppLinkUtility,
}

impl SubsystemId {
    pub fn name(&self) -> &'static str {
        match self {
            SubsystemId::ErrorDomain => "error_domain",
            SubsystemId::ModelManager => "model_manager",
            SubsystemId::GraphRequest => "graph_request",
            SubsystemId::FeatureManager => "feature_manager",
            SubsystemId::InstrumentManager => "instrument_manager",
            SubsystemId::AppLinkUtility => "app_link_utility",
        }
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Categories of configuration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsystemErrorKind {
    /// A required collaborator was not supplied.
    MissingDependency,
    /// Supplied configuration cannot be used.
    InvalidConfiguration,
}

impl SubsystemErrorKind {
    /// Code saved with the error report.
    pub fn code(&self) -> i64 {
        match self {
            Self::MissingDependency => 1,
            Self::InvalidConfiguration => 2,
        }
    }
}

impl fmt::Display for SubsystemErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDependency => write!(f, "MissingDependency"),
            Self::InvalidConfiguration => write!(f, "InvalidConfiguration"),
        }
    }
}

/// A subsystem refused its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{subsystem}] {kind}: {message}")]
pub struct SubsystemError {
    pub subsystem: SubsystemId,
    pub kind: SubsystemErrorKind,
    pub message: String,
}

impl SubsystemError {
    pub fn invalid_configuration(subsystem: SubsystemId, message: impl Into<String>) -> Self {
        Self {
            subsystem,
            kind: SubsystemErrorKind::InvalidConfiguration,
            message: message.into(),
        }
    }

    pub fn missing_dependency(subsystem: SubsystemId, message: impl Into<String>) -> Self {
        Self {
            subsystem,
            kind: SubsystemErrorKind::MissingDependency,
            message: message.into(),
        }
    }
}

// =============================================================================
// CONFIGURATION ENTRY POINT
// =============================================================================

/// Everything a subsystem may be wired with.
pub struct SubsystemWiring<'a> {
    pub dependencies: &'a ResolvedDependencies,
    pub request_factory: &'a Arc<GraphRequestFactory>,
    pub config: &'a SdkConfig,
}

/// A subsystem with a one-shot configuration entry point.
pub trait ConfigurableSubsystem: Send + Sync {
    fn id(&self) -> SubsystemId;

    /// Store references to the collaborators this subsystem uses.
    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError>;

    fn is_configured(&self) -> bool;

    /// Drop every stored reference.
    fn reset(&self);
}

// =============================================================================
// SUBSYSTEM SET
// =============================================================================

/// The subsystem instances one SDK context configures.
#[derive(Clone)]
pub struct Subsystems {
    pub error_domain: Arc<ErrorDomain>,
    pub model_manager: Arc<ModelManager>,
    pub request_factory: Arc<GraphRequestFactory>,
    pub feature_manager: Arc<FeatureManager>,
    pub instrument_manager: Arc<InstrumentManager>,
    pub app_link_utility: Arc<AppLinkUtility>,
}

impl Default for Subsystems {
    /// Fresh, context-local instances.
    fn default() -> Self {
        Self {
            error_domain: Arc::new(ErrorDomain::new()),
            model_manager: Arc::new(ModelManager::new()),
            request_factory: Arc::new(GraphRequestFactory::new()),
            feature_manager: Arc::new(FeatureManager::new()),
            instrument_manager: Arc::new(InstrumentManager::new(CrashHandler::shared())),
            app_link_utility: Arc::new(AppLinkUtility::new()),
        }
    }
}

impl Subsystems {
    /// The process-wide instances used by the shared SDK context.
    pub fn shared() -> Self {
        Self {
            error_domain: ErrorDomain::shared(),
            model_manager: ModelManager::shared(),
            request_factory: GraphRequestFactory::shared(),
            feature_manager: FeatureManager::shared(),
            instrument_manager: InstrumentManager::shared(),
            app_link_utility: AppLinkUtility::shared(),
        }
    }

    /// Subsystems in configuration order.
    pub fn ordered(&self) -> [Arc<dyn ConfigurableSubsystem>; 6] {
        [
            self.error_domain.clone(),
            self.model_manager.clone(),
            self.request_factory.clone(),
            self.feature_manager.clone(),
            self.instrument_manager.clone(),
            self.app_link_utility.clone(),
        ]
    }

    pub fn reset(&self) {
        for subsystem in self.ordered() {
            subsystem.reset();
        }
    }
}
