//! # Notification Center
//!
//! Defines the publishing side of the bus and the in-memory implementation
//! used as the process-wide default.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::events::HostEvent;
use crate::subscriber::{
    HostCallback, ObserverEvidence, Subscription, SubscriptionError, SubscriptionToken,
};

/// Host event bus.
///
/// Implementations must be safe to call from any thread; callbacks run on the
/// thread that posts.
pub trait NotificationCenter: Send + Sync {
    /// Subscribe `callback` to `event` on behalf of `observer`.
    ///
    /// Subscribing the same `(observer, event, handler)` tuple twice returns
    /// the token of the existing subscription.
    fn add_observer(
        &self,
        observer: Uuid,
        event: HostEvent,
        handler: &'static str,
        callback: HostCallback,
    ) -> SubscriptionToken;

    /// Remove the subscription identified by `token`.
    fn remove_observer(&self, token: SubscriptionToken) -> Result<(), SubscriptionError>;

    /// Deliver `event` to every subscriber, returning how many were invoked.
    fn post(&self, event: HostEvent) -> usize;
}

lazy_static! {
    static ref SHARED_CENTER: Arc<InMemoryNotificationCenter> =
        Arc::new(InMemoryNotificationCenter::new());
}

/// In-memory notification center.
///
/// Delivery order is subscription order. Callbacks are snapshotted before
/// delivery so a callback may subscribe or unsubscribe without deadlocking.
#[derive(Debug, Default)]
pub struct InMemoryNotificationCenter {
    subscriptions: RwLock<Vec<Subscription>>,
    events_posted: AtomicU64,
}

impl InMemoryNotificationCenter {
    /// Create an empty center.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default center.
    #[must_use]
    pub fn shared() -> Arc<InMemoryNotificationCenter> {
        SHARED_CENTER.clone()
    }

    /// Evidence for every active subscription, in subscription order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<ObserverEvidence> {
        self.subscriptions
            .read()
            .iter()
            .map(|s| s.evidence.clone())
            .collect()
    }

    /// Whether a subscription matching `evidence` is active.
    #[must_use]
    pub fn contains(&self, evidence: &ObserverEvidence) -> bool {
        self.subscriptions
            .read()
            .iter()
            .any(|s| &s.evidence == evidence)
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Total events posted.
    #[must_use]
    pub fn events_posted(&self) -> u64 {
        self.events_posted.load(Ordering::Relaxed)
    }
}

impl NotificationCenter for InMemoryNotificationCenter {
    fn add_observer(
        &self,
        observer: Uuid,
        event: HostEvent,
        handler: &'static str,
        callback: HostCallback,
    ) -> SubscriptionToken {
        let evidence = ObserverEvidence {
            observer,
            event,
            handler,
        };

        let mut subs = self.subscriptions.write();
        if let Some(existing) = subs.iter().find(|s| s.evidence == evidence) {
            trace!(event = event.name(), handler, "Subscription already present");
            return existing.token;
        }

        let token = SubscriptionToken::new();
        subs.push(Subscription {
            token,
            evidence,
            callback,
        });
        debug!(event = event.name(), handler, %token, "Observer added");
        token
    }

    fn remove_observer(&self, token: SubscriptionToken) -> Result<(), SubscriptionError> {
        let mut subs = self.subscriptions.write();
        let Some(index) = subs.iter().position(|s| s.token == token) else {
            return Err(SubscriptionError::UnknownToken(token));
        };
        let removed = subs.remove(index);
        debug!(
            event = removed.evidence.event.name(),
            handler = removed.evidence.handler,
            %token,
            "Observer removed"
        );
        Ok(())
    }

    fn post(&self, event: HostEvent) -> usize {
        self.events_posted.fetch_add(1, Ordering::Relaxed);

        let callbacks: Vec<HostCallback> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.evidence.event == event)
            .map(|s| s.callback.clone())
            .collect();

        debug!(event = event.name(), receivers = callbacks.len(), "Event posted");
        for callback in &callbacks {
            callback(event);
        }
        callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<HostEvent>>>, HostCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, Arc::new(move |e: HostEvent| sink.lock().push(e)))
    }

    #[test]
    fn test_post_reaches_matching_subscribers_only() {
        let center = InMemoryNotificationCenter::new();
        let (seen, callback) = recorder();
        center.add_observer(Uuid::new_v4(), HostEvent::DidBecomeActive, "active", callback);

        assert_eq!(center.post(HostEvent::DidEnterBackground), 0);
        assert_eq!(center.post(HostEvent::DidBecomeActive), 1);
        assert_eq!(*seen.lock(), vec![HostEvent::DidBecomeActive]);
        assert_eq!(center.events_posted(), 2);
    }

    #[test]
    fn test_duplicate_tuple_returns_existing_token() {
        let center = InMemoryNotificationCenter::new();
        let id = Uuid::new_v4();
        let (_, callback) = recorder();

        let first = center.add_observer(id, HostEvent::WillResignActive, "resign", callback.clone());
        let second = center.add_observer(id, HostEvent::WillResignActive, "resign", callback);

        assert_eq!(first, second);
        assert_eq!(center.subscriber_count(), 1);
    }

    #[test]
    fn test_remove_by_token() {
        let center = InMemoryNotificationCenter::new();
        let id = Uuid::new_v4();
        let (seen, callback) = recorder();
        let token = center.add_observer(id, HostEvent::DidEnterBackground, "bg", callback);

        assert!(center.contains(&ObserverEvidence {
            observer: id,
            event: HostEvent::DidEnterBackground,
            handler: "bg",
        }));

        center.remove_observer(token).unwrap();
        assert_eq!(center.post(HostEvent::DidEnterBackground), 0);
        assert!(seen.lock().is_empty());
        assert_eq!(
            center.remove_observer(token),
            Err(SubscriptionError::UnknownToken(token))
        );
    }

    #[test]
    fn test_callback_may_unsubscribe_during_post() {
        let center = Arc::new(InMemoryNotificationCenter::new());
        let token_slot: Arc<Mutex<Option<SubscriptionToken>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&center);
        let slot = token_slot.clone();
        let token = center.add_observer(
            Uuid::new_v4(),
            HostEvent::DidBecomeActive,
            "once",
            Arc::new(move |_| {
                if let (Some(center), Some(token)) = (weak.upgrade(), *slot.lock()) {
                    let _ = center.remove_observer(token);
                }
            }),
        );
        *token_slot.lock() = Some(token);

        assert_eq!(center.post(HostEvent::DidBecomeActive), 1);
        assert_eq!(center.subscriber_count(), 0);
    }

    #[test]
    fn test_shared_is_process_wide() {
        assert!(Arc::ptr_eq(
            &InMemoryNotificationCenter::shared(),
            &InMemoryNotificationCenter::shared()
        ));
    }
}
