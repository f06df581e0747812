//! # Lifecycle Bus - Typed Host Event Bus
//!
//! Carries host lifecycle signals (background, foreground, resign-active) to
//! the callbacks that subscribed to them.
//!
//! ## Subscription Model
//!
//! ```text
//! ┌──────────────┐  add_observer(id, event, handler, callback)  ┌──────────────────┐
//! │   Listener   │ ───────────────────────────────────────────► │ NotificationCenter│
//! │              │ ◄─────────────── SubscriptionToken ───────── │                  │
//! └──────────────┘                                              └────────┬─────────┘
//!        ▲                                                               │ post(event)
//!        └────────────────────────── callback(event) ────────────────────┘
//! ```
//!
//! A subscription is identified by `(observer id, event, handler name)`.
//! Removal goes through the token returned at subscription time, never
//! through matching on opaque callback identity.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod center;
pub mod events;
pub mod subscriber;

pub use center::{InMemoryNotificationCenter, NotificationCenter};
pub use events::HostEvent;
pub use subscriber::{HostCallback, ObserverEvidence, SubscriptionError, SubscriptionToken};
