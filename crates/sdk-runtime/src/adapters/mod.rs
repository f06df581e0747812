//! # Adapter Implementations
//!
//! Default collaborators for every dependency role. Each one is a
//! process-wide singleton reachable through `shared()` (or `standard()` for
//! the store), so two containers that both fall back to defaults resolve to
//! the same instances.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     OUTER LAYER (Adapters)                          │
//! │  SdkSettings, GateKeeperManager, AppEvents, UserDefaults, ...       │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     MIDDLE LAYER (Ports)                            │
//! │  trait Settings, trait GateKeeper, trait EventLogger, ...           │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     INNER LAYER (Orchestration)                     │
//! │  DependencyContainer, SdkInitializer, LifecycleBridge               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app_events;
pub mod gate_keeper;
pub mod identity;
pub mod ports;
pub mod reporting;
pub mod server_configuration;
pub mod settings;
pub mod store;

pub use app_events::*;
pub use gate_keeper::*;
pub use identity::*;
pub use ports::*;
pub use reporting::*;
pub use server_configuration::*;
pub use settings::*;
pub use store::*;
