//! Top-level facade crate for the brownout admission bridge.
//!
//! Re-exports core types and the bridge library so users can depend on a single crate.

pub mod core {
    pub use brownout_core::*;
}

pub mod bridge {
    pub use brownout_bridge::*;
}
