//! Reference policy with a fixed queue-length setpoint.
//!
//! Serves the optional feature while the queue is at or below the setpoint and
//! reports a per-period summary through the facade. Arrivals are counted from
//! the probe sent ahead of each admission query; explicit arrival reports are
//! accepted and ignored. It exercises the whole
//! bridge contract (telemetry, admission, setpoint, self-rescheduling) without
//! adapting anything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use brownout_core::protocol::telemetry::TelemetryEvent;
use brownout_core::protocol::value::PolicyValue;
use brownout_core::{PolicyError, PolicyResult};

use super::{Policy, PolicyOptions};
use crate::scheduler::SchedulerFacade;

pub const MODULE: &str = "static-setpoint";
pub const ENTRY_POINT: &str = "new_instance";

const DEFAULT_SETPOINT: i64 = 10;

#[derive(Debug, Default)]
struct Window {
    arrivals: u64,
    departures: u64,
    optional_departures: u64,
    rt_sum: f64,
    rt_max: f64,
}

struct State {
    setpoint: i64,
    window: Window,
}

pub struct StaticSetpointPolicy {
    state: Rc<RefCell<State>>,
}

/// Entry point registered as `static-setpoint.new_instance`.
pub fn new_instance(
    sim: SchedulerFacade,
    identity: &str,
    options: &PolicyOptions,
) -> PolicyResult<Box<dyn Policy>> {
    let setpoint = options.param_i64("setpoint")?.unwrap_or(DEFAULT_SETPOINT);
    if setpoint < 0 {
        return Err(PolicyError::BadArgument(format!(
            "setpoint must not be negative ({setpoint} given)"
        )));
    }

    let state = Rc::new(RefCell::new(State {
        setpoint,
        window: Window::default(),
    }));

    schedule_next(sim, identity.to_string(), Rc::downgrade(&state))?;

    Ok(Box::new(StaticSetpointPolicy { state }))
}

fn schedule_next(sim: SchedulerFacade, identity: String, state: Weak<RefCell<State>>) -> PolicyResult<()> {
    let period = sim.control_period();
    let next = sim.clone();
    sim.schedule(period, Box::new(move || run_control_loop(next, identity, state)))
}

fn run_control_loop(sim: SchedulerFacade, identity: String, state: Weak<RefCell<State>>) -> PolicyResult<()> {
    // Instance already gone; nothing left to report.
    let Some(strong) = state.upgrade() else {
        return Ok(());
    };

    let w = std::mem::take(&mut strong.borrow_mut().window);
    let avg_rt = if w.departures > 0 {
        w.rt_sum / w.departures as f64
    } else {
        f64::NAN
    };
    let optional_ratio = if w.departures > 0 {
        w.optional_departures as f64 / w.departures as f64
    } else {
        f64::NAN
    };

    sim.emit(
        &identity,
        &format!(
            "{:.5},{},{},{:.5},{:.5},{:.5}",
            sim.now(),
            w.arrivals,
            w.departures,
            avg_rt,
            w.rt_max,
            optional_ratio
        ),
    );

    schedule_next(sim, identity, state)
}

impl Policy for StaticSetpointPolicy {
    fn report_data(&mut self, event: &TelemetryEvent) -> PolicyResult<()> {
        let mut s = self.state.borrow_mut();
        if event.is_probe() {
            // One probe precedes every admission query.
            s.window.arrivals += 1;
        } else if !event.is_arrival {
            s.window.departures += 1;
            s.window.rt_sum += event.response_time;
            s.window.rt_max = s.window.rt_max.max(event.response_time);
            if event.with_optional {
                s.window.optional_departures += 1;
            }
        }
        Ok(())
    }

    fn with_optional(&mut self, queue_length: i64) -> PolicyResult<Vec<PolicyValue>> {
        let setpoint = self.state.borrow().setpoint;
        Ok(vec![PolicyValue::Bool(queue_length <= setpoint)])
    }

    fn queue_length_setpoint(&self) -> Option<PolicyValue> {
        Some(PolicyValue::Int(self.state.borrow().setpoint))
    }
}
