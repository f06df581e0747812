//! # URL Router
//!
//! Hands an opened URL to every open-URL listener. Every listener sees the URL
//! even after an earlier one handled it; the router never interprets schemes.

use std::sync::Arc;

use sdk_telemetry::URL_OPENS;
use sdk_types::{AppUrl, OpenUrlOptions};
use tracing::debug;

use crate::registry::ApplicationObserver;

#[derive(Debug, Default, Clone, Copy)]
pub struct UrlRouter;

impl UrlRouter {
    pub fn new() -> Self {
        Self
    }

    /// Route `url` through `listeners` in order. Returns whether any handled it.
    pub fn route(
        &self,
        url: &AppUrl,
        options: &OpenUrlOptions,
        listeners: &[Arc<dyn ApplicationObserver>],
    ) -> bool {
        let mut handled = false;
        for observer in listeners {
            if let Some(listener) = observer.as_open_url() {
                handled |= listener.application_open_url(url, options);
            }
        }

        let outcome = if handled { "handled" } else { "unhandled" };
        URL_OPENS.with_label_values(&[outcome]).inc();
        debug!(
            scheme = %url.scheme(),
            listeners = listeners.len(),
            outcome,
            "URL routed"
        );
        handled
    }
}
