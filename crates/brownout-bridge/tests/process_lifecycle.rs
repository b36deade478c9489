//! The process-wide runtime. Kept alone in its own test binary because the
//! state it checks cannot be reset.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::rc::Rc;

use brownout_bridge::clock::ManualClock;
use brownout_bridge::config;
use brownout_bridge::lifecycle::{LifecycleState, Runtime};
use brownout_bridge::policy::PolicyRegistry;
use brownout_bridge::ControllerBridge;
use brownout_core::BrownoutError;

#[test]
fn process_runtime_init_shutdown_is_one_shot() {
    let cfg = config::load_default().unwrap();
    let reg = PolicyRegistry::with_builtins();
    assert_eq!(Runtime::process().state(), LifecycleState::Uninitialized);

    let mut bridge = ControllerBridge::init(&cfg.controller, &reg, Rc::new(ManualClock::new(0.0)))
        .expect("init on the process runtime");
    assert_eq!(Runtime::process().state(), LifecycleState::Ready);
    assert!(bridge.admit_with_optional(1));

    bridge.shutdown();
    assert_eq!(Runtime::process().state(), LifecycleState::Shutdown);

    let err = ControllerBridge::init(&cfg.controller, &reg, Rc::new(ManualClock::new(0.0)))
        .err()
        .expect("cannot reinitialize after teardown");
    assert!(matches!(err, BrownoutError::Finalized));
}
