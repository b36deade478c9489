//! Controller bridge: the contract the enforcement point calls.
//!
//! Every call is synchronous and single-threaded. Policy misbehaviour at call
//! time is logged and absorbed; only startup failures surface as errors.

use std::rc::Rc;
use std::sync::Arc;

use brownout_core::error::Result;
use brownout_core::protocol::telemetry::TelemetryEvent;

use crate::clock::SimClock;
use crate::config::ControllerSection;
use crate::lifecycle::Runtime;
use crate::obs::BridgeMetrics;
use crate::policy::handle::PolicySource;
use crate::policy::{PolicyHandle, PolicyRegistry};

pub struct ControllerBridge {
    runtime: &'static Runtime,
    handle: PolicyHandle,
    current_queue_length: i64,
    metrics: Arc<BridgeMetrics>,
}

impl ControllerBridge {
    /// Start the process runtime and load the configured policy.
    pub fn init(
        cfg: &ControllerSection,
        registry: &PolicyRegistry,
        clock: Rc<dyn SimClock>,
    ) -> Result<Self> {
        Self::init_in(Runtime::process(), cfg, registry, clock)
    }

    /// Same as [`ControllerBridge::init`] against an explicit runtime.
    ///
    /// A construction failure finalizes the runtime: the process is not
    /// expected to continue without a policy.
    pub fn init_in(
        runtime: &'static Runtime,
        cfg: &ControllerSection,
        registry: &PolicyRegistry,
        clock: Rc<dyn SimClock>,
    ) -> Result<Self> {
        runtime.start()?;

        let metrics = Arc::new(BridgeMetrics::default());
        let source = PolicySource {
            module: &cfg.policy,
            entry_point: &cfg.entry_point,
            identity: &cfg.identity,
            options: cfg.policy_options(),
        };

        let handle = match PolicyHandle::construct(registry, source, clock, Arc::clone(&metrics)) {
            Ok(h) => h,
            Err(e) => {
                tracing::error!(op = "init", error = %e, "policy construction failed");
                runtime.finalize();
                return Err(e);
            }
        };

        Ok(Self {
            runtime,
            handle,
            current_queue_length: 0,
            metrics,
        })
    }

    /// Decide whether the request being admitted gets the optional feature.
    ///
    /// `hypothetical_queue_length` already counts the arriving request. On a
    /// policy failure the optional feature is refused.
    pub fn admit_with_optional(&mut self, hypothetical_queue_length: i64) -> bool {
        self.current_queue_length += 1;
        self.metrics.queue_length.set(self.current_queue_length);

        let _ = self.handle.invoke_telemetry(&TelemetryEvent::PROBE);

        let decision = match self.handle.invoke_admission(hypothetical_queue_length) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::error!(
                    op = "admit_with_optional",
                    queue_length = hypothetical_queue_length,
                    error = %e,
                    "admission query failed; refusing optional feature"
                );
                None
            }
        };

        let outcome = match decision {
            Some(true) => "optional",
            Some(false) => "plain",
            None => {
                self.metrics.policy_errors.inc(&[("op", "admit_with_optional")]);
                "fallback"
            }
        };
        self.metrics.admissions.inc(&[("outcome", outcome)]);
        decision.unwrap_or(false)
    }

    /// Report that an admitted request has been enqueued.
    pub fn report_arrival(&mut self, queue_length: i64, with_optional: bool) {
        let _ = self
            .handle
            .invoke_telemetry(&TelemetryEvent::arrival(queue_length, with_optional));
    }

    /// Report that a request has completed.
    pub fn report_departure(&mut self, response_time: f64, queue_length_after: i64, with_optional: bool) {
        self.current_queue_length -= 1;
        self.metrics.queue_length.set(self.current_queue_length);

        let _ = self.handle.invoke_telemetry(&TelemetryEvent::departure(
            response_time,
            queue_length_after,
            with_optional,
        ));
    }

    /// The policy's current queue-length setpoint as text, for upstream hints.
    pub fn upstream_info(&self) -> Option<String> {
        self.handle.read_upstream_setpoint()
    }

    /// Pump the policy's deferred work. Call once per control period.
    pub fn run_control_loop(&mut self) {
        self.handle.pump_deferred();
    }

    pub fn current_queue_length(&self) -> i64 {
        self.current_queue_length
    }

    pub fn has_pending_callback(&self) -> bool {
        self.handle.has_pending()
    }

    /// Eligibility time of the pending callback, if any.
    pub fn pending_due_at(&self) -> Option<f64> {
        self.handle.pending_due_at()
    }

    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Release the policy and finalize the runtime. Irreversible.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for ControllerBridge {
    fn drop(&mut self) {
        tracing::info!(
            op = "shutdown",
            module = self.handle.module(),
            identity = self.handle.identity(),
            "releasing policy"
        );
        drop(self.handle.take_pending());
        self.runtime.finalize();
    }
}
