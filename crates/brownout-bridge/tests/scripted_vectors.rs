//! Scripted bridge scenarios from JSON vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::rc::Rc;

use brownout_bridge::clock::ManualClock;
use brownout_bridge::lifecycle::Runtime;
use brownout_bridge::ControllerBridge;

mod stub_policy;
use stub_policy::{controller_cfg, registry, StubSpec};
use vector_loader::Step;

fn run(rt: &'static Runtime, name: &str) {
    let v = vector_loader::load(name);
    let spec = StubSpec {
        reply: v.reply.clone(),
        setpoint: v.setpoint.clone(),
        fail_report: false,
        fail_admission: false,
    };
    let (reg, _probe) = registry(spec);
    let mut bridge = ControllerBridge::init_in(rt, &controller_cfg(), &reg, Rc::new(ManualClock::new(0.0)))
        .expect("init");

    for (i, step) in v.steps.iter().enumerate() {
        let ctx = format!("vector={} step={i}", v.description);
        match step {
            Step::Admit { queue_length, expect } => {
                assert_eq!(bridge.admit_with_optional(*queue_length), *expect, "{ctx}");
            }
            Step::Arrival { queue_length, with_optional } => {
                bridge.report_arrival(*queue_length, *with_optional);
            }
            Step::Departure { response_time, queue_length, with_optional } => {
                bridge.report_departure(*response_time, *queue_length, *with_optional);
            }
            Step::Upstream { expect } => {
                assert_eq!(bridge.upstream_info(), *expect, "{ctx}");
            }
            Step::ControlLoop => bridge.run_control_loop(),
            Step::QueueLength { expect } => {
                assert_eq!(bridge.current_queue_length(), *expect, "{ctx}");
            }
        }
    }

    assert_eq!(bridge.metrics().policy_errors.total(), v.expect_policy_errors, "vector={}", v.description);
    bridge.shutdown();
}

#[test]
fn always_optional() {
    static RT: Runtime = Runtime::new();
    run(&RT, "always_optional.json");
}

#[test]
fn malformed_reply() {
    static RT: Runtime = Runtime::new();
    run(&RT, "malformed_reply.json");
}

#[test]
fn float_setpoint() {
    static RT: Runtime = Runtime::new();
    run(&RT, "float_setpoint.json");
}
