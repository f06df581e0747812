//! # Graph Request Construction
//!
//! The request factory owned by the initializer. Once configured it stamps
//! every request with the current access token and the configured API
//! version. Sending requests is outside this crate.

use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use super::{ConfigurableSubsystem, SubsystemError, SubsystemId, SubsystemWiring};
use crate::adapters::{AccessTokenWallet, Settings};
use crate::container::DEFAULT_GRAPH_API_VERSION;

lazy_static! {
    static ref SHARED: Arc<GraphRequestFactory> = Arc::new(GraphRequestFactory::new());
}

/// A request ready to be handed to a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRequest {
    pub graph_path: String,
    pub parameters: BTreeMap<String, Value>,
    pub token_string: Option<String>,
    pub version: String,
}

#[derive(Clone)]
struct RequestWiring {
    token_wallet: Arc<dyn AccessTokenWallet>,
    settings: Arc<dyn Settings>,
}

#[derive(Default)]
pub struct GraphRequestFactory {
    wiring: RwLock<Option<RequestWiring>>,
}

impl GraphRequestFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<GraphRequestFactory> {
        Arc::clone(&SHARED)
    }

    /// Token source requests are stamped from.
    pub fn token_wallet(&self) -> Option<Arc<dyn AccessTokenWallet>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.token_wallet))
    }

    pub fn settings(&self) -> Option<Arc<dyn Settings>> {
        self.wiring.read().as_ref().map(|w| Arc::clone(&w.settings))
    }

    pub fn create(&self, graph_path: &str, parameters: BTreeMap<String, Value>) -> GraphRequest {
        let wiring = self.wiring.read().clone();
        let (token_string, version) = match wiring {
            Some(w) => (w.token_wallet.current_token_string(), w.settings.graph_api_version()),
            None => (None, DEFAULT_GRAPH_API_VERSION.to_string()),
        };

        GraphRequest {
            graph_path: graph_path.trim_start_matches('/').to_string(),
            parameters,
            token_string,
            version,
        }
    }
}

impl ConfigurableSubsystem for GraphRequestFactory {
    fn id(&self) -> SubsystemId {
        SubsystemId::GraphRequest
    }

    fn configure(&self, wiring: &SubsystemWiring<'_>) -> Result<(), SubsystemError> {
        let deps = wiring.dependencies;
        *self.wiring.write() = Some(RequestWiring {
            token_wallet: Arc::clone(&deps.token_wallet),
            settings: Arc::clone(&deps.settings),
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
