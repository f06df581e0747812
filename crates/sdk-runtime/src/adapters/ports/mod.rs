//! # Collaborator Ports
//!
//! One trait per dependency role. The container resolves every role to an
//! `Arc<dyn Port>`; the defaults in the parent module implement them, tests
//! and alternate environments substitute their own.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      DependencyContainer                         │
//! │   settings ─┐  feature checker ─┐  event logger ─┐   ...         │
//! └─────────────┼───────────────────┼────────────────┼───────────────┘
//!               ↓                   ↓                ↓
//!         trait Settings   trait FeatureChecker  trait EventLogger
//!               ↑                   ↑                ↑
//!          SdkSettings        FeatureManager       AppEvents      (defaults)
//!          TestSettings       TestFeatureChecker   TestAppEvents  (tests)
//! ```

pub mod analytics;
pub mod identity;
pub mod platform;

pub use analytics::*;
pub use identity::*;
pub use platform::*;
