//! # SDK Runtime Library
//!
//! The application lifecycle orchestrator. The `sdk-host` binary drives a
//! simulated host through a full lifecycle; everything it uses lives here.
//!
//! ## Modules
//!
//! - `container/` - Collaborator roles, lazy shared defaults and overrides
//! - `adapters/` - Ports (role traits) and their default implementations
//! - `subsystems/` - SDK subsystems configured once during bootstrap
//! - `registry/` - Observer capabilities and lifecycle fan-out
//! - `router/` - Opened-URL dispatch to observers
//! - `wiring/` - One-time bootstrap and the host lifecycle bridge
//! - `delegate` - The context object the host talks to
//!
//! ## Flow
//!
//! ```text
//! host signal ──→ LifecycleBridge ──(first signal)──→ SdkInitializer
//!                      │                                   │
//!                      │                        DependencyContainer
//!                      │                                   │
//!                      │                         Subsystems configured
//!                      ▼
//!               ObserverRegistry ──→ observers
//!                      │
//!    open URL ──→ feature gate ──→ UrlRouter ──→ open-URL observers
//! ```

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod delegate;
pub mod registry;
pub mod router;
pub mod subsystems;
pub mod wiring;

pub use container::{DependencyContainer, DependencySet, Kit, Role, SdkConfig};
pub use delegate::{ApplicationDelegate, ApplicationDelegateBuilder};
pub use registry::{
    ApplicationObserver, DidBecomeActiveListener, DidEnterBackgroundListener,
    DidFinishLaunchingListener, LifecycleEvent, ObserverRegistry, OpenUrlListener,
    WillResignActiveListener,
};
pub use router::UrlRouter;
pub use wiring::{AccessTokenExpirer, InitializationState, LifecycleBridge, SdkInitializer};
