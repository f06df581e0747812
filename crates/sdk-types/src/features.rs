//! # Feature Identifiers
//!
//! Features form a tree: a feature is only enabled when its parent is. The
//! gate-keeper key of a feature is `FBSDKFeature<Name>`.

use serde::{Deserialize, Serialize};

/// A gated SDK feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Root of the tree.
    Core,
    AppEvents,
    CodelessEvents,
    RestrictiveDataFiltering,
    Aam,
    PrivacyProtection,
    EventDeactivation,
    SkAdNetwork,
    /// Aggregated event measurement, checked on every URL open.
    Aem,
    Instrument,
    CrashReport,
    ErrorReport,
    Login,
    Share,
}

impl Feature {
    /// Stable feature name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Core => "CoreKit",
            Self::AppEvents => "AppEvents",
            Self::CodelessEvents => "CodelessEvents",
            Self::RestrictiveDataFiltering => "RestrictiveDataFiltering",
            Self::Aam => "AAM",
            Self::PrivacyProtection => "PrivacyProtection",
            Self::EventDeactivation => "EventDeactivation",
            Self::SkAdNetwork => "SKAdNetwork",
            Self::Aem => "AEM",
            Self::Instrument => "Instrument",
            Self::CrashReport => "CrashReport",
            Self::ErrorReport => "ErrorReport",
            Self::Login => "LoginKit",
            Self::Share => "ShareKit",
        }
    }

    /// Parent feature, `None` only for [`Feature::Core`].
    #[must_use]
    pub fn parent(&self) -> Option<Feature> {
        match self {
            Self::Core => None,
            Self::AppEvents | Self::Instrument | Self::Login | Self::Share => Some(Self::Core),
            Self::CodelessEvents
            | Self::RestrictiveDataFiltering
            | Self::Aam
            | Self::PrivacyProtection
            | Self::EventDeactivation
            | Self::SkAdNetwork
            | Self::Aem => Some(Self::AppEvents),
            Self::CrashReport | Self::ErrorReport => Some(Self::Instrument),
        }
    }

    /// Whether the feature is on when no gate keeper value is known.
    #[must_use]
    pub fn enabled_by_default(&self) -> bool {
        !matches!(
            self,
            Self::CodelessEvents
                | Self::RestrictiveDataFiltering
                | Self::Aam
                | Self::PrivacyProtection
                | Self::EventDeactivation
                | Self::SkAdNetwork
                | Self::Aem
        )
    }

    /// Gate keeper key for this feature.
    #[must_use]
    pub fn gate_key(&self) -> String {
        format!("FBSDKFeature{}", self.name())
    }
}
