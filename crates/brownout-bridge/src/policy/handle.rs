//! Owned handle on exactly one loaded policy instance.

use std::rc::Rc;
use std::sync::Arc;

use brownout_core::error::{BrownoutError, Result};
use brownout_core::protocol::telemetry::TelemetryEvent;
use brownout_core::protocol::value::admission_decision;
use brownout_core::PolicyResult;

use super::{Policy, PolicyOptions, PolicyRegistry};
use crate::clock::SimClock;
use crate::obs::BridgeMetrics;
use crate::scheduler::{CallbackSlot, DeferredCallback, SchedulerFacade};

/// Where to load a policy from and what to hand it.
#[derive(Debug, Clone)]
pub struct PolicySource<'a> {
    pub module: &'a str,
    pub entry_point: &'a str,
    pub identity: &'a str,
    pub options: PolicyOptions,
}

pub struct PolicyHandle {
    policy: Box<dyn Policy>,
    slot: CallbackSlot,
    module: String,
    identity: String,
    metrics: Arc<BridgeMetrics>,
}

impl PolicyHandle {
    /// Load the policy and construct one instance bound to a fresh facade.
    ///
    /// Every error returned here is fatal for the caller.
    pub fn construct(
        registry: &PolicyRegistry,
        source: PolicySource<'_>,
        clock: Rc<dyn SimClock>,
        metrics: Arc<BridgeMetrics>,
    ) -> Result<Self> {
        let ctor = registry.resolve(source.module, source.entry_point)?;

        let slot = CallbackSlot::new();
        let sim = SchedulerFacade::new(
            clock,
            slot.clone(),
            source.options.control_period,
            Arc::clone(&metrics),
        );

        let policy = match ctor(sim, source.identity, &source.options) {
            Ok(p) => p,
            Err(e) => {
                // A half-built policy may already have scheduled itself.
                drop(slot.take());
                return Err(BrownoutError::ConstructorFailed {
                    module: source.module.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(
            op = "construct",
            module = source.module,
            identity = source.identity,
            "policy instance created"
        );

        Ok(Self {
            policy,
            slot,
            module: source.module.to_string(),
            identity: source.identity.to_string(),
            metrics,
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Ask whether to serve the optional feature at `queue_length`.
    pub fn invoke_admission(&mut self, queue_length: i64) -> PolicyResult<bool> {
        let reply = self.policy.with_optional(queue_length)?;
        admission_decision(&reply)
    }

    /// Push one telemetry event. Failures are logged and returned, never fatal.
    pub fn invoke_telemetry(&mut self, event: &TelemetryEvent) -> PolicyResult<()> {
        self.metrics.telemetry_events.inc(&[("kind", event.kind())]);
        let res = self.policy.report_data(event);
        if let Err(e) = &res {
            self.metrics.policy_errors.inc(&[("op", "report_data")]);
            tracing::error!(op = "report_data", kind = event.kind(), error = %e, "telemetry push failed");
        }
        res
    }

    /// Textual `queueLengthSetpoint`, or `None` (logged) if absent or unprintable.
    pub fn read_upstream_setpoint(&self) -> Option<String> {
        let Some(value) = self.policy.queue_length_setpoint() else {
            self.metrics.policy_errors.inc(&[("op", "upstream_info")]);
            tracing::error!(op = "upstream_info", "queueLengthSetpoint not found");
            return None;
        };
        let text = value.to_text();
        if text.is_none() {
            self.metrics.policy_errors.inc(&[("op", "upstream_info")]);
            tracing::error!(
                op = "upstream_info",
                value_type = value.type_name(),
                "queueLengthSetpoint not convertible to string"
            );
        }
        text
    }

    /// Run the pending deferred callback, if any. Returns whether one ran.
    ///
    /// The slot is cleared before the callback runs so a callback that
    /// reschedules itself is not clobbered.
    pub fn pump_deferred(&mut self) -> bool {
        let Some(cb) = self.slot.take() else {
            return false;
        };

        match cb.invoke() {
            Ok(()) => self.metrics.control_loop_runs.inc(&[("outcome", "ok")]),
            Err(e) => {
                self.metrics.control_loop_runs.inc(&[("outcome", "error")]);
                self.metrics.policy_errors.inc(&[("op", "run_control_loop")]);
                tracing::error!(op = "run_control_loop", error = %e, "deferred callback failed");
            }
        }
        true
    }

    /// Remove the pending callback without running it.
    pub fn take_pending(&mut self) -> Option<DeferredCallback> {
        self.slot.take()
    }

    pub fn has_pending(&self) -> bool {
        self.slot.is_pending()
    }

    pub fn pending_due_at(&self) -> Option<f64> {
        self.slot.due_at()
    }
}

impl Drop for PolicyHandle {
    fn drop(&mut self) {
        // Pending callbacks usually hold a facade clone, which holds the slot.
        drop(self.slot.take());
    }
}
