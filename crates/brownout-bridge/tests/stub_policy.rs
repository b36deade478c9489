//! Scriptable stub policy shared by bridge tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use brownout_bridge::config::ControllerSection;
use brownout_bridge::policy::{Policy, PolicyOptions, PolicyRegistry};
use brownout_bridge::scheduler::SchedulerFacade;
use brownout_core::protocol::telemetry::TelemetryEvent;
use brownout_core::protocol::value::PolicyValue;
use brownout_core::{PolicyError, PolicyResult};

pub const MODULE: &str = "stub";
pub const ENTRY_POINT: &str = "new_instance";
pub const IDENTITY: &str = "pyController0";

/// How the stub answers.
#[derive(Debug, Clone)]
pub struct StubSpec {
    pub reply: Vec<PolicyValue>,
    pub setpoint: Option<PolicyValue>,
    pub fail_report: bool,
    pub fail_admission: bool,
}

impl StubSpec {
    pub fn always(decision: bool) -> Self {
        Self {
            reply: vec![PolicyValue::Bool(decision)],
            setpoint: Some(PolicyValue::Int(5)),
            fail_report: false,
            fail_admission: false,
        }
    }
}

/// What the stub observed, shared with the test body.
#[derive(Clone, Default)]
pub struct Probe {
    pub events: Rc<RefCell<Vec<TelemetryEvent>>>,
    pub queries: Rc<RefCell<Vec<i64>>>,
    pub sim: Rc<RefCell<Option<SchedulerFacade>>>,
    pub constructed_with: Rc<RefCell<Option<(String, PolicyOptions)>>>,
}

impl Probe {
    /// The facade handed to the policy at construction.
    pub fn sim(&self) -> SchedulerFacade {
        self.sim.borrow().clone().expect("policy was not constructed")
    }
}

struct StubPolicy {
    spec: StubSpec,
    probe: Probe,
}

impl Policy for StubPolicy {
    fn report_data(&mut self, event: &TelemetryEvent) -> PolicyResult<()> {
        self.probe.events.borrow_mut().push(*event);
        if self.spec.fail_report {
            return Err(PolicyError::Raised("reportData exploded".into()));
        }
        Ok(())
    }

    fn with_optional(&mut self, queue_length: i64) -> PolicyResult<Vec<PolicyValue>> {
        self.probe.queries.borrow_mut().push(queue_length);
        if self.spec.fail_admission {
            return Err(PolicyError::Raised("withOptional exploded".into()));
        }
        Ok(self.spec.reply.clone())
    }

    fn queue_length_setpoint(&self) -> Option<PolicyValue> {
        self.spec.setpoint.clone()
    }
}

pub fn registry(spec: StubSpec) -> (PolicyRegistry, Probe) {
    let probe = Probe::default();
    let reg = PolicyRegistry::new();
    let captured = probe.clone();
    reg.register(
        MODULE,
        ENTRY_POINT,
        Rc::new(
            move |sim: SchedulerFacade, identity: &str, options: &PolicyOptions| -> PolicyResult<Box<dyn Policy>> {
                *captured.sim.borrow_mut() = Some(sim);
                *captured.constructed_with.borrow_mut() = Some((identity.to_string(), options.clone()));
                Ok(Box::new(StubPolicy {
                    spec: spec.clone(),
                    probe: captured.clone(),
                }))
            },
        ),
    );
    (reg, probe)
}

pub fn controller_cfg() -> ControllerSection {
    ControllerSection {
        policy: MODULE.into(),
        entry_point: ENTRY_POINT.into(),
        identity: IDENTITY.into(),
        control_period_s: 0.5,
        params: BTreeMap::new(),
    }
}
