//! # Dependency Container
//!
//! The pluggable collaborator set of one SDK context and its static
//! configuration.
//!
//! - Every role resolves to exactly one collaborator
//! - Defaults are the process-wide `shared()` instances, materialized lazily
//! - Overrides replace defaults until a reset

pub mod config;
pub mod dependencies;

pub use config::{
    ConfigError, Kit, SdkConfig, DEFAULT_GRAPH_API_VERSION, KITS_BITMASK_KEY, SDK_INITIALIZE_EVENT,
};
pub use dependencies::{
    same_instance, DependencyContainer, DependencySet, ResolvedDependencies, Role,
};
