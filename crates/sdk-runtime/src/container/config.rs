//! # SDK Configuration
//!
//! Static configuration of one SDK context: identity of the host app, the
//! installed kits reported by the SDK-initialize event, and the locations the
//! subsystems are wired with.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SDK_APP_ID` | unset | Application identifier |
//! | `SDK_GRAPH_API_VERSION` | `v13.0` | Graph API version for requests |
//! | `SDK_KITS` | unset | Comma-separated installed kits (`login,share`) |
//! | `SDK_MODEL_DIR` | `models` | Directory the model manager stores into |
//! | `SDK_AUTO_LOG_APP_EVENTS` | `true` | Automatic app event logging |
//! | `SDK_URL_SCHEMES` | unset | Comma-separated URL schemes the app handles |

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Persisted key for the last reported kit bitmask.
pub const KITS_BITMASK_KEY: &str = "com.facebook.sdk.kits.bitmask";

/// Internal event logged when the installed kit set changes.
pub const SDK_INITIALIZE_EVENT: &str = "fb_sdk_initialize";

/// Graph API version used when none is configured.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v13.0";

// =============================================================================
// KITS
// =============================================================================

/// An SDK kit that may be linked into the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kit {
    Core,
    Login,
    Share,
    Places,
    Messenger,
    AppLinks,
    Marketing,
    Tv,
}

impl Kit {
    pub fn all() -> &'static [Kit] {
        &[
            Kit::Core,
            Kit::Login,
            Kit::Share,
            Kit::Places,
            Kit::Messenger,
            Kit::AppLinks,
            Kit::Marketing,
            Kit::Tv,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kit::Core => "core",
            Kit::Login => "login",
            Kit::Share => "share",
            Kit::Places => "places",
            Kit::Messenger => "messenger",
            Kit::AppLinks => "applinks",
            Kit::Marketing => "marketing",
            Kit::Tv => "tv",
        }
    }

    /// Bit position in the kit bitmask. Core is always present and has none.
    pub fn bit(&self) -> Option<u32> {
        match self {
            Kit::Core => None,
            Kit::Login => Some(0),
            Kit::Share => Some(1),
            Kit::Places => Some(2),
            Kit::Messenger => Some(3),
            Kit::AppLinks => Some(4),
            Kit::Marketing => Some(5),
            Kit::Tv => Some(6),
        }
    }

    /// Parameter key reported in the SDK-initialize event.
    pub fn param_key(&self) -> String {
        format!("{}_lib_included", self.name())
    }
}

impl FromStr for Kit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Kit::all()
            .iter()
            .copied()
            .find(|k| k.name() == needle)
            .ok_or_else(|| ConfigError::UnknownKit(s.trim().to_string()))
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown kit `{0}`")]
    UnknownKit(String),

    #[error("App id must be numeric, got `{0}`")]
    InvalidAppId(String),

    #[error("Graph API version must look like `v13.0`, got `{0}`")]
    InvalidGraphApiVersion(String),

    #[error("Model directory must not be empty")]
    EmptyModelDirectory,

    #[error("Invalid URL scheme `{0}`")]
    InvalidUrlScheme(String),
}

/// Configuration of one SDK context.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkConfig {
    pub app_id: Option<String>,
    pub graph_api_version: String,
    /// Kits linked into the host app. Core is implied.
    pub installed_kits: Vec<Kit>,
    pub model_directory: PathBuf,
    pub auto_log_app_events: bool,
    pub url_schemes: Vec<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            graph_api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            installed_kits: Vec::new(),
            model_directory: PathBuf::from("models"),
            auto_log_app_events: true,
            url_schemes: Vec::new(),
        }
    }
}

impl SdkConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Unknown kit names are skipped with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let installed_kits = std::env::var("SDK_KITS")
            .map(|raw| {
                split_list(&raw)
                    .filter_map(|name| match name.parse::<Kit>() {
                        Ok(kit) => Some(kit),
                        Err(e) => {
                            warn!(error = %e, "Ignoring SDK_KITS entry");
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            app_id: std::env::var("SDK_APP_ID").ok().filter(|v| !v.is_empty()),
            graph_api_version: std::env::var("SDK_GRAPH_API_VERSION")
                .unwrap_or(defaults.graph_api_version),
            installed_kits,
            model_directory: std::env::var("SDK_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_directory),
            auto_log_app_events: std::env::var("SDK_AUTO_LOG_APP_EVENTS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.auto_log_app_events),
            url_schemes: std::env::var("SDK_URL_SCHEMES")
                .map(|raw| split_list(&raw).map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// Check the configuration for values the subsystems cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(app_id) = &self.app_id {
            if app_id.is_empty() || !app_id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::InvalidAppId(app_id.clone()));
            }
        }

        let version = &self.graph_api_version;
        let well_formed = version
            .strip_prefix('v')
            .and_then(|rest| rest.split_once('.'))
            .is_some_and(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.bytes().all(|b| b.is_ascii_digit())
                    && minor.bytes().all(|b| b.is_ascii_digit())
            });
        if !well_formed {
            return Err(ConfigError::InvalidGraphApiVersion(version.clone()));
        }

        if self.model_directory.as_os_str().is_empty() {
            return Err(ConfigError::EmptyModelDirectory);
        }

        for scheme in &self.url_schemes {
            let mut chars = scheme.chars();
            let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid {
                return Err(ConfigError::InvalidUrlScheme(scheme.clone()));
            }
        }

        Ok(())
    }

    /// Bitmask of the installed kits.
    pub fn kits_bitmask(&self) -> i64 {
        self.installed_kits
            .iter()
            .filter_map(Kit::bit)
            .fold(0, |mask, bit| mask | (1 << bit))
    }

    /// Whether `kit` is linked. Core always is.
    pub fn has_kit(&self, kit: Kit) -> bool {
        kit == Kit::Core || self.installed_kits.contains(&kit)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SdkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_bitmask_is_zero() {
        assert_eq!(SdkConfig::default().kits_bitmask(), 0);
    }

    #[test]
    fn test_bitmask_follows_kit_order() {
        let config = SdkConfig {
            installed_kits: vec![Kit::Core, Kit::Login, Kit::Messenger, Kit::Tv],
            ..SdkConfig::default()
        };
        assert_eq!(config.kits_bitmask(), 0b100_1001);
    }

    #[test]
    fn test_kit_parsing() {
        assert_eq!("Login".parse::<Kit>().unwrap(), Kit::Login);
        assert_eq!(" applinks ".parse::<Kit>().unwrap(), Kit::AppLinks);
        assert_eq!(
            "gaming".parse::<Kit>(),
            Err(ConfigError::UnknownKit("gaming".into()))
        );
    }

    #[test]
    fn test_param_keys() {
        assert_eq!(Kit::Core.param_key(), "core_lib_included");
        assert_eq!(Kit::AppLinks.param_key(), "applinks_lib_included");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_app = SdkConfig {
            app_id: Some("12a".into()),
            ..SdkConfig::default()
        };
        assert!(matches!(bad_app.validate(), Err(ConfigError::InvalidAppId(_))));

        let bad_version = SdkConfig {
            graph_api_version: "13".into(),
            ..SdkConfig::default()
        };
        assert!(matches!(
            bad_version.validate(),
            Err(ConfigError::InvalidGraphApiVersion(_))
        ));

        let bad_scheme = SdkConfig {
            url_schemes: vec!["1fb".into()],
            ..SdkConfig::default()
        };
        assert!(matches!(
            bad_scheme.validate(),
            Err(ConfigError::InvalidUrlScheme(_))
        ));

        let no_dir = SdkConfig {
            model_directory: PathBuf::new(),
            ..SdkConfig::default()
        };
        assert_eq!(no_dir.validate(), Err(ConfigError::EmptyModelDirectory));
    }

    #[test]
    fn test_has_kit_implies_core() {
        let config = SdkConfig::default();
        assert!(config.has_kit(Kit::Core));
        assert!(!config.has_kit(Kit::Share));
    }
}
