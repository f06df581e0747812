//! # Observer Registry
//!
//! The set of application observers and the fan-out of lifecycle events to
//! them.
//!
//! ## How It Works
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ObserverRegistry                           │
//! │                                                                 │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐                       │
//! │  │ observer │  │ observer │  │   ...    │  Arc                  │
//! │  │    A     │  │    B     │  │          │                       │
//! │  └────┬─────┘  └────┬─────┘  └──────────┘                       │
//! │       │             │                                           │
//! │       └─────────────┴──── snapshot ──→ as_will_resign_active()  │
//! │                                        Some(listener) → call    │
//! │                                        None           → skip    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Membership is by identity of the observer allocation, so adding twice is
//!   a no-op
//! - Delivery follows insertion order; each member is called once per event
//! - Observers added during a dispatch do not receive that dispatch
//! - Members stay until removed or the registry is cleared

use std::sync::Arc;

use parking_lot::RwLock;
use sdk_telemetry::{LIFECYCLE_EVENTS_DISPATCHED, OBSERVERS_REGISTERED};
use sdk_types::{AppUrl, LaunchContext, OpenUrlOptions};
use tracing::debug;

// =============================================================================
// CAPABILITIES
// =============================================================================

pub trait DidFinishLaunchingListener: Send + Sync {
    /// Returns `true` when the observer handled the launch.
    fn application_did_finish_launching(&self, launch: &LaunchContext) -> bool;
}

pub trait DidBecomeActiveListener: Send + Sync {
    fn application_did_become_active(&self);
}

pub trait WillResignActiveListener: Send + Sync {
    fn application_will_resign_active(&self);
}

pub trait DidEnterBackgroundListener: Send + Sync {
    fn application_did_enter_background(&self);
}

pub trait OpenUrlListener: Send + Sync {
    /// Returns `true` when the observer handled the URL.
    fn application_open_url(&self, url: &AppUrl, options: &OpenUrlOptions) -> bool;
}

/// A party interested in application lifecycle events.
///
/// Every capability is optional. An observer opts into one by returning
/// itself from the matching accessor:
///
/// ```rust,ignore
/// impl ApplicationObserver for SessionTracker {
///     fn as_will_resign_active(&self) -> Option<&dyn WillResignActiveListener> {
///         Some(self)
///     }
/// }
/// ```
pub trait ApplicationObserver: Send + Sync {
    fn as_did_finish_launching(&self) -> Option<&dyn DidFinishLaunchingListener> {
        None
    }

    fn as_did_become_active(&self) -> Option<&dyn DidBecomeActiveListener> {
        None
    }

    fn as_will_resign_active(&self) -> Option<&dyn WillResignActiveListener> {
        None
    }

    fn as_did_enter_background(&self) -> Option<&dyn DidEnterBackgroundListener> {
        None
    }

    fn as_open_url(&self) -> Option<&dyn OpenUrlListener> {
        None
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// A lifecycle event delivered to observers.
#[derive(Debug, Clone, Copy)]
pub enum LifecycleEvent<'a> {
    DidFinishLaunching(&'a LaunchContext),
    DidBecomeActive,
    WillResignActive,
    DidEnterBackground,
}

impl LifecycleEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::DidFinishLaunching(_) => "did_finish_launching",
            LifecycleEvent::DidBecomeActive => "did_become_active",
            LifecycleEvent::WillResignActive => "will_resign_active",
            LifecycleEvent::DidEnterBackground => "did_enter_background",
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

fn same_observer(a: &Arc<dyn ApplicationObserver>, b: &Arc<dyn ApplicationObserver>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<dyn ApplicationObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `observer` unless it is already a member. Returns whether it was added.
    pub fn add(&self, observer: Arc<dyn ApplicationObserver>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        observers.push(observer);
        OBSERVERS_REGISTERED.set(observers.len() as f64);
        debug!(count = observers.len(), "Observer added");
        true
    }

    /// Remove `observer` if it is a member. Returns whether it was removed.
    pub fn remove(&self, observer: Arc<dyn ApplicationObserver>) -> bool {
        let mut observers = self.observers.write();
        let Some(index) = observers.iter().position(|o| same_observer(o, &observer)) else {
            return false;
        };
        observers.remove(index);
        OBSERVERS_REGISTERED.set(observers.len() as f64);
        debug!(count = observers.len(), "Observer removed");
        true
    }

    pub fn contains(&self, observer: &Arc<dyn ApplicationObserver>) -> bool {
        self.observers
            .read()
            .iter()
            .any(|o| same_observer(o, observer))
    }

    pub fn count(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    pub fn clear(&self) {
        self.observers.write().clear();
        OBSERVERS_REGISTERED.set(0.0);
    }

    /// Members in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<dyn ApplicationObserver>> {
        self.observers.read().clone()
    }

    /// Members that accept opened URLs, in insertion order.
    pub fn open_url_listeners(&self) -> Vec<Arc<dyn ApplicationObserver>> {
        self.snapshot()
            .into_iter()
            .filter(|o| o.as_open_url().is_some())
            .collect()
    }

    /// Deliver `event` to every member that declares the matching capability.
    ///
    /// Returns whether any finish-launch listener handled the launch; `false`
    /// for every other event.
    pub fn notify(&self, event: LifecycleEvent<'_>) -> bool {
        let members = self.snapshot();
        let mut handled = false;
        let mut delivered = 0usize;

        for observer in &members {
            match event {
                LifecycleEvent::DidFinishLaunching(launch) => {
                    if let Some(listener) = observer.as_did_finish_launching() {
                        handled |= listener.application_did_finish_launching(launch);
                        delivered += 1;
                    }
                }
                LifecycleEvent::DidBecomeActive => {
                    if let Some(listener) = observer.as_did_become_active() {
                        listener.application_did_become_active();
                        delivered += 1;
                    }
                }
                LifecycleEvent::WillResignActive => {
                    if let Some(listener) = observer.as_will_resign_active() {
                        listener.application_will_resign_active();
                        delivered += 1;
                    }
                }
                LifecycleEvent::DidEnterBackground => {
                    if let Some(listener) = observer.as_did_enter_background() {
                        listener.application_did_enter_background();
                        delivered += 1;
                    }
                }
            }
        }

        LIFECYCLE_EVENTS_DISPATCHED
            .with_label_values(&[event.name()])
            .inc();
        debug!(
            event = event.name(),
            members = members.len(),
            delivered,
            handled,
            "Lifecycle event dispatched"
        );
        handled
    }
}
