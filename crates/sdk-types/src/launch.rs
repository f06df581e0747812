//! # Host Option Maps
//!
//! The host hands the application loosely typed option maps at finish-launch
//! and on URL open. This module captures them into immutable values, keeping
//! unrecognized keys for opaque forwarding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::entities::{AppUrl, BackgroundRefreshStatus};

/// Raw option map as delivered by the host.
pub type LaunchOptions = BTreeMap<String, Value>;

/// Launch option key carrying the bundle id of the application that launched us.
pub const LAUNCH_OPTION_SOURCE_APPLICATION: &str = "source_application";

/// Launch option key carrying the URL the application was launched with.
pub const LAUNCH_OPTION_URL: &str = "url";

/// Launch option key carrying the background refresh status.
pub const LAUNCH_OPTION_BACKGROUND_REFRESH: &str = "background_refresh_status";

/// Open-URL option key carrying the source application.
pub const OPEN_URL_OPTION_SOURCE_APPLICATION: &str = "source_application";

/// Open-URL option key carrying the annotation.
pub const OPEN_URL_OPTION_ANNOTATION: &str = "annotation";

/// Launch-time values captured once at finish-launch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchContext {
    source_application: Option<String>,
    url: Option<AppUrl>,
    background_refresh_status: BackgroundRefreshStatus,
    extra: LaunchOptions,
}

impl LaunchContext {
    /// Capture a launch context from the host option map.
    ///
    /// Malformed values for recognized keys are dropped with a warning; a bad
    /// option never prevents launch.
    pub fn from_options(options: &LaunchOptions) -> Self {
        let mut ctx = Self::default();

        for (key, value) in options {
            match key.as_str() {
                LAUNCH_OPTION_SOURCE_APPLICATION => match value.as_str() {
                    Some(source) => ctx.source_application = Some(source.to_string()),
                    None => warn!(key = %key, "Ignoring non-string launch option"),
                },
                LAUNCH_OPTION_URL => match value.as_str().map(AppUrl::parse) {
                    Some(Ok(url)) => ctx.url = Some(url),
                    Some(Err(e)) => warn!(key = %key, error = %e, "Ignoring invalid launch URL"),
                    None => warn!(key = %key, "Ignoring non-string launch option"),
                },
                LAUNCH_OPTION_BACKGROUND_REFRESH => {
                    match value.as_str().map(str::parse::<BackgroundRefreshStatus>) {
                        Some(Ok(status)) => ctx.background_refresh_status = status,
                        _ => warn!(key = %key, "Ignoring invalid background refresh status"),
                    }
                }
                _ => {
                    ctx.extra.insert(key.clone(), value.clone());
                }
            }
        }

        ctx
    }

    /// Builder-style setter for the source application.
    #[must_use]
    pub fn with_source_application(mut self, source: impl Into<String>) -> Self {
        self.source_application = Some(source.into());
        self
    }

    /// Builder-style setter for the launch URL.
    #[must_use]
    pub fn with_url(mut self, url: AppUrl) -> Self {
        self.url = Some(url);
        self
    }

    #[must_use]
    pub fn source_application(&self) -> Option<&str> {
        self.source_application.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&AppUrl> {
        self.url.as_ref()
    }

    #[must_use]
    pub fn background_refresh_status(&self) -> BackgroundRefreshStatus {
        self.background_refresh_status
    }

    /// Options the SDK does not interpret.
    #[must_use]
    pub fn extra(&self) -> &LaunchOptions {
        &self.extra
    }

    /// Whether any session-scoped value (source application or URL) is present.
    #[must_use]
    pub fn has_session_source(&self) -> bool {
        self.source_application.is_some() || self.url.is_some()
    }
}

/// Options delivered alongside an opened URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenUrlOptions {
    pub source_application: Option<String>,
    pub annotation: Option<Value>,
    /// Unrecognized keys, forwarded opaquely to handlers.
    pub extra: LaunchOptions,
}

impl OpenUrlOptions {
    /// Capture open-URL options from the host map.
    pub fn from_options(options: &LaunchOptions) -> Self {
        let mut out = Self::default();
        for (key, value) in options {
            match key.as_str() {
                OPEN_URL_OPTION_SOURCE_APPLICATION => match value.as_str() {
                    Some(source) => out.source_application = Some(source.to_string()),
                    None => warn!(key = %key, "Ignoring non-string source application"),
                },
                OPEN_URL_OPTION_ANNOTATION => out.annotation = Some(value.clone()),
                _ => {
                    out.extra.insert(key.clone(), value.clone());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(pairs: &[(&str, Value)]) -> LaunchOptions {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_launch_context_recognized_keys() {
        let ctx = LaunchContext::from_options(&options(&[
            (LAUNCH_OPTION_SOURCE_APPLICATION, json!("com.example.source")),
            (LAUNCH_OPTION_URL, json!("fb123://open")),
            (LAUNCH_OPTION_BACKGROUND_REFRESH, json!("denied")),
            ("custom", json!({"a": 1})),
        ]));

        assert_eq!(ctx.source_application(), Some("com.example.source"));
        assert_eq!(ctx.url().map(AppUrl::as_str), Some("fb123://open"));
        assert_eq!(ctx.background_refresh_status(), BackgroundRefreshStatus::Denied);
        assert_eq!(ctx.extra().get("custom"), Some(&json!({"a": 1})));
        assert!(ctx.has_session_source());
    }

    #[test]
    fn test_launch_context_drops_malformed_values() {
        let ctx = LaunchContext::from_options(&options(&[
            (LAUNCH_OPTION_SOURCE_APPLICATION, json!(17)),
            (LAUNCH_OPTION_URL, json!("not a url")),
        ]));

        assert_eq!(ctx.source_application(), None);
        assert_eq!(ctx.url(), None);
        assert!(!ctx.has_session_source());
        assert!(ctx.extra().is_empty());
    }

    #[test]
    fn test_open_url_options_forward_unknown_keys() {
        let opts = OpenUrlOptions::from_options(&options(&[
            (OPEN_URL_OPTION_SOURCE_APPLICATION, json!("com.apple.mobilesafari")),
            (OPEN_URL_OPTION_ANNOTATION, json!(["x"])),
            ("open_in_place", json!(true)),
        ]));

        assert_eq!(opts.source_application.as_deref(), Some("com.apple.mobilesafari"));
        assert_eq!(opts.annotation, Some(json!(["x"])));
        assert_eq!(opts.extra.get("open_in_place"), Some(&json!(true)));
    }
}
