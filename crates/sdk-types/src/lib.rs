//! # SDK Types Crate
//!
//! Values shared across the lifecycle SDK crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every value that crosses a crate boundary
//!   (launch options, opened URLs, identity records) is defined here.
//! - **Immutable Inputs**: `LaunchContext` and `OpenUrlOptions` are captured
//!   once from the host maps and never mutated afterwards.
//! - **Opaque Forwarding**: Unrecognized host option keys are preserved and
//!   forwarded untouched to downstream handlers.

pub mod entities;
pub mod errors;
pub mod features;
pub mod launch;

pub use entities::*;
pub use errors::*;
pub use features::Feature;
pub use launch::*;
