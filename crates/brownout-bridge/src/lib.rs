//! Brownout admission bridge library entry.
//!
//! This crate wires the scheduler facade, policy registry and handle, the
//! process lifecycle, and the controller bridge into the contract an
//! enforcement point calls for every request. It is consumed by the
//! `brownout-sim` binary and by integration tests.

pub mod bridge;
pub mod clock;
pub mod config;
pub mod driver;
pub mod lifecycle;
pub mod obs;
pub mod policy;
pub mod scheduler;

pub use bridge::ControllerBridge;
