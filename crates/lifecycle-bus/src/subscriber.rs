//! # Subscriptions
//!
//! Defines the subscription side of the bus: tokens, callbacks and the
//! evidence record used to inspect who subscribed to what.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::events::HostEvent;

/// Callback invoked when a subscribed event is posted.
pub type HostCallback = Arc<dyn Fn(HostEvent) + Send + Sync>;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The token does not belong to an active subscription.
    #[error("Unknown subscription token {0}")]
    UnknownToken(SubscriptionToken),
}

/// Handle returned by `add_observer`, required for precise removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(Uuid);

impl SubscriptionToken {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identifying tuple of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObserverEvidence {
    /// Identity of the subscribing listener.
    pub observer: Uuid,
    /// Event subscribed to.
    pub event: HostEvent,
    /// Name of the handler the callback forwards to.
    pub handler: &'static str,
}

/// An active subscription held by a notification center.
pub(crate) struct Subscription {
    pub(crate) token: SubscriptionToken,
    pub(crate) evidence: ObserverEvidence,
    pub(crate) callback: HostCallback,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .field("evidence", &self.evidence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(SubscriptionToken::new(), SubscriptionToken::new());
    }

    #[test]
    fn test_unknown_token_display() {
        let token = SubscriptionToken::new();
        let err = SubscriptionError::UnknownToken(token);
        assert!(err.to_string().starts_with("Unknown subscription token"));
    }
}
