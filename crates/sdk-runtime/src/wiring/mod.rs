//! # Lifecycle Wiring
//!
//! Connects the host application to the SDK: the one-time bootstrap that
//! configures every subsystem, and the bridge that turns host signals into
//! observer callbacks.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          LIFECYCLE WIRING                            │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │   host delegate calls          NotificationCenter (HostEvent)        │
//! │            │                              │                          │
//! │            └──────────────┬───────────────┘                          │
//! │                           ▼                                          │
//! │                  ┌──────────────────┐   first signal   ┌──────────┐  │
//! │                  │ LifecycleBridge  │ ───────────────→ │   Sdk    │  │
//! │                  │ (ApplicationState│                  │Initializer│ │
//! │                  └────────┬─────────┘ ←── registers ── └────┬─────┘  │
//! │                           │              host events        │        │
//! │                           ▼                                 ▼        │
//! │                   ObserverRegistry                  Subsystems (6)   │
//! │                   UrlRouter                         configured once  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod initializer;
pub mod lifecycle;
pub mod token_expirer;

pub use initializer::{HostEventRegistrar, InitializationState, SdkInitializer};
pub use lifecycle::{handler_name, LifecycleBridge};
pub use token_expirer::AccessTokenExpirer;
