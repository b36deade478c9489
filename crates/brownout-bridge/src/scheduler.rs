//! Clock/Scheduler facade handed to a policy at construction.
//!
//! The facade is the policy's only view of time, its only way to defer work,
//! and its only diagnostic channel. Deferred work is not a timer: it sits in a
//! single slot until the driving loop pumps the bridge.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use brownout_core::{PolicyError, PolicyResult};

use crate::clock::SimClock;
use crate::obs::BridgeMetrics;

/// Tolerance when comparing a requested delay with the control period.
const PERIOD_EPSILON: f64 = 1e-9;

/// Work a policy asks to run later.
pub type Callback = Box<dyn FnOnce() -> PolicyResult<()>>;

/// A callback plus the simulated time at which it becomes eligible.
pub struct DeferredCallback {
    pub due_at: f64,
    callback: Callback,
}

impl DeferredCallback {
    pub fn new(due_at: f64, callback: Callback) -> Self {
        Self { due_at, callback }
    }

    /// Consume and run the callback.
    pub fn invoke(self) -> PolicyResult<()> {
        (self.callback)()
    }
}

impl fmt::Debug for DeferredCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCallback")
            .field("due_at", &self.due_at)
            .finish_non_exhaustive()
    }
}

/// Holds at most one pending callback. Last write wins.
#[derive(Clone, Default)]
pub struct CallbackSlot {
    inner: Rc<RefCell<Option<DeferredCallback>>>,
}

impl CallbackSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a callback; returns the one it displaced, if any.
    pub fn replace(&self, cb: DeferredCallback) -> Option<DeferredCallback> {
        self.inner.borrow_mut().replace(cb)
    }

    /// Take the pending callback, leaving the slot empty.
    pub fn take(&self) -> Option<DeferredCallback> {
        self.inner.borrow_mut().take()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.borrow().is_some()
    }

    pub fn due_at(&self) -> Option<f64> {
        self.inner.borrow().as_ref().map(|cb| cb.due_at)
    }
}

/// The `sim` object a policy talks to: `now`, `add` (schedule) and `output`.
#[derive(Clone)]
pub struct SchedulerFacade {
    clock: Rc<dyn SimClock>,
    slot: CallbackSlot,
    control_period: f64,
    metrics: Arc<BridgeMetrics>,
}

impl SchedulerFacade {
    pub fn new(
        clock: Rc<dyn SimClock>,
        slot: CallbackSlot,
        control_period: f64,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            clock,
            slot,
            control_period,
            metrics,
        }
    }

    /// Current simulated time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// The fixed period at which the driving loop pumps deferred work.
    pub fn control_period(&self) -> f64 {
        self.control_period
    }

    /// Register `callback` to run once `delay` seconds have elapsed.
    ///
    /// Any delay is honoured only at the driving loop's next pump, so a delay
    /// other than the control period is accepted with a warning. A callback
    /// still pending is replaced.
    pub fn schedule(&self, delay: f64, callback: Callback) -> PolicyResult<()> {
        if !delay.is_finite() || delay <= 0.0 {
            tracing::error!(op = "schedule", delay, "delay must be a positive number of seconds");
            return Err(PolicyError::BadArgument(format!(
                "delay must be a positive number of seconds ({delay} given)"
            )));
        }

        if (delay - self.control_period).abs() > PERIOD_EPSILON {
            tracing::warn!(
                op = "schedule",
                delay,
                control_period = self.control_period,
                "driving loop only pumps once per control period; requested delay will not be honoured exactly"
            );
        }

        let due_at = self.now() + delay;
        if let Some(old) = self.slot.replace(DeferredCallback::new(due_at, callback)) {
            self.metrics.callbacks_replaced.inc(&[]);
            tracing::debug!(op = "schedule", old_due_at = old.due_at, due_at, "replaced pending callback");
        }
        Ok(())
    }

    /// Diagnostic output from the policy. Never fails.
    pub fn emit(&self, source: &str, message: &str) {
        tracing::info!(target: "brownout::policy", op = "output", source, "{message}");
    }
}
