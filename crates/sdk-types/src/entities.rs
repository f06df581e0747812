//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Routing**: `AppUrl`
//! - **Identity**: `AccessToken`, `AuthenticationToken`, `Profile`
//! - **Host State**: `ApplicationState`, `BackgroundRefreshStatus`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SdkError;

// =============================================================================
// CLUSTER A: ROUTING
// =============================================================================

/// A URL handed to the application by the host (deep link, universal link).
///
/// Only the scheme is validated; everything after the first `:` is kept
/// verbatim and interpreted by downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppUrl(String);

impl AppUrl {
    /// Parse a URL, requiring an RFC 3986 scheme followed by a non-empty rest.
    pub fn parse(raw: &str) -> Result<Self, SdkError> {
        let raw = raw.trim();
        let Some((scheme, rest)) = raw.split_once(':') else {
            return Err(SdkError::InvalidUrl(raw.to_string()));
        };

        let mut chars = scheme.chars();
        let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let scheme_ok =
            starts_alpha && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

        if !scheme_ok || rest.is_empty() {
            return Err(SdkError::InvalidUrl(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// The scheme, lower-cased.
    #[must_use]
    pub fn scheme(&self) -> String {
        self.0
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// The host component for hierarchical URLs (`scheme://host/...`).
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once("://")?;
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let host = &rest[..end];
        (!host.is_empty()).then_some(host)
    }

    /// The full URL string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AppUrl {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AppUrl {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AppUrl> for String {
    fn from(url: AppUrl) -> Self {
        url.0
    }
}

// =============================================================================
// CLUSTER B: IDENTITY
// =============================================================================

/// An access token as cached by the token wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token_string: String,
    pub user_id: String,
    pub app_id: String,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token has passed its expiration date.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expiration_date.is_some_and(|exp| exp <= Utc::now())
    }
}

/// An OpenID-style authentication token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationToken {
    pub token_string: String,
    pub nonce: String,
}

/// A cached identity record keyed by user id.
///
/// The orchestrator never inspects the fields; it only moves the record from
/// the cache into the current-profile slot at finish-launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub link_url: Option<AppUrl>,
    pub refresh_date: Option<DateTime<Utc>>,
}

impl Profile {
    /// A profile carrying only a user id.
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: None,
            middle_name: None,
            last_name: None,
            name: None,
            link_url: None,
            refresh_date: None,
        }
    }
}

// =============================================================================
// CLUSTER C: HOST STATE
// =============================================================================

/// Application state as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplicationState {
    /// No lifecycle signal observed yet.
    #[default]
    Unknown,
    /// In the foreground and receiving events.
    Active,
    /// In the foreground but not receiving events (resigned active).
    Inactive,
    /// In the background.
    Background,
}

/// Whether the host allows background refresh for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundRefreshStatus {
    #[default]
    Available,
    Denied,
    Restricted,
}

impl BackgroundRefreshStatus {
    /// Stable name used in event parameters and option maps.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Denied => "denied",
            Self::Restricted => "restricted",
        }
    }
}

impl FromStr for BackgroundRefreshStatus {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "denied" => Ok(Self::Denied),
            "restricted" => Ok(Self::Restricted),
            _ => Err(SdkError::InvalidOption {
                key: "background_refresh_status",
                expected: "one of available, denied, restricted",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_url() {
        let url = AppUrl::parse("fb123://authorize?state=abc").unwrap();
        assert_eq!(url.scheme(), "fb123");
        assert_eq!(url.host(), Some("authorize"));
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        assert!(AppUrl::parse("no-scheme-here").is_err());
        assert!(AppUrl::parse("1abc://x").is_err());
        assert!(AppUrl::parse("https:").is_err());
    }

    #[test]
    fn test_non_hierarchical_url_has_no_host() {
        let url = AppUrl::parse("mailto:someone@example.com").unwrap();
        assert_eq!(url.scheme(), "mailto");
        assert_eq!(url.host(), None);
    }

    #[test]
    fn test_url_serde_validates() {
        let ok: AppUrl = serde_json::from_str("\"https://example.com\"").unwrap();
        assert_eq!(ok.as_str(), "https://example.com");
        assert!(serde_json::from_str::<AppUrl>("\"garbage\"").is_err());
    }

    #[test]
    fn test_profile_cache_format() {
        let mut profile = Profile::with_user_id("42");
        profile.name = Some("Ada".into());
        let json = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_token_expiry() {
        let mut token = AccessToken {
            token_string: "t".into(),
            user_id: "u".into(),
            app_id: "a".into(),
            expiration_date: None,
        };
        assert!(!token.is_expired());
        token.expiration_date = Some(Utc::now() - chrono::Duration::seconds(5));
        assert!(token.is_expired());
    }

    #[test]
    fn test_background_refresh_from_str() {
        assert_eq!(
            "denied".parse::<BackgroundRefreshStatus>().unwrap(),
            BackgroundRefreshStatus::Denied
        );
        assert!("sometimes".parse::<BackgroundRefreshStatus>().is_err());
    }
}
