//! # Host Events
//!
//! Signals the host emits on its event-delivery thread.

use serde::{Deserialize, Serialize};

/// Lifecycle notifications delivered through the notification center.
///
/// Finish-launch and open-URL are delivered as direct calls by the host, not
/// through the bus, so they have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostEvent {
    /// The application moved to the background.
    DidEnterBackground,
    /// The application became active (foreground).
    DidBecomeActive,
    /// The application is about to resign active status.
    WillResignActive,
}

impl HostEvent {
    /// Host notification name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DidEnterBackground => "UIApplicationDidEnterBackgroundNotification",
            Self::DidBecomeActive => "UIApplicationDidBecomeActiveNotification",
            Self::WillResignActive => "UIApplicationWillResignActiveNotification",
        }
    }

    /// All bus-delivered events.
    #[must_use]
    pub fn all() -> [HostEvent; 3] {
        [
            Self::DidEnterBackground,
            Self::DidBecomeActive,
            Self::WillResignActive,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_distinct() {
        let names: std::collections::HashSet<_> = HostEvent::all().iter().map(HostEvent::name).collect();
        assert_eq!(names.len(), 3);
    }
}
