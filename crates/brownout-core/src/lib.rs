//! Brownout core: runtime-agnostic contracts shared by the admission bridge
//! and any policy binding.
//!
//! This crate defines the telemetry wire shape, the dynamic reply values a
//! foreign policy hands back, and the error surface. It intentionally carries
//! no clock, registry, or logging-subscriber dependencies so a policy binding
//! can depend on it alone.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A misbehaving policy must surface as `PolicyError`, never as a crash of the
//! enforcement point.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result types.
pub use error::{BrownoutError, PolicyError, PolicyResult, Result};
