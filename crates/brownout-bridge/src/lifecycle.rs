//! Process-wide policy runtime lifecycle.
//!
//! One runtime per process: `Uninitialized -> Ready -> Shutdown`. Shutdown is
//! terminal; a finalized runtime refuses to start again.

use std::sync::atomic::{AtomicU8, Ordering};

use brownout_core::error::{BrownoutError, Result};

const UNINITIALIZED: u8 = 0;
const READY: u8 = 1;
const SHUTDOWN: u8 = 2;

static PROCESS: Runtime = Runtime::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    Shutdown,
}

#[derive(Debug)]
pub struct Runtime {
    state: AtomicU8,
}

impl Runtime {
    /// A fresh, uninitialized runtime. Usable in `static` items.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// The runtime shared by the whole process.
    pub fn process() -> &'static Runtime {
        &PROCESS
    }

    pub fn state(&self) -> LifecycleState {
        match self.state.load(Ordering::Acquire) {
            UNINITIALIZED => LifecycleState::Uninitialized,
            READY => LifecycleState::Ready,
            _ => LifecycleState::Shutdown,
        }
    }

    /// `Uninitialized -> Ready`. Not reentrant.
    pub fn start(&self) -> Result<()> {
        match self
            .state
            .compare_exchange(UNINITIALIZED, READY, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                tracing::info!(op = "init", "policy runtime initialized");
                Ok(())
            }
            Err(READY) => Err(BrownoutError::AlreadyInitialized),
            Err(_) => Err(BrownoutError::Finalized),
        }
    }

    /// Move to `Shutdown`. Irreversible; repeated calls are no-ops.
    pub fn finalize(&self) {
        if self.state.swap(SHUTDOWN, Ordering::AcqRel) != SHUTDOWN {
            tracing::info!(op = "shutdown", "policy runtime finalized");
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
