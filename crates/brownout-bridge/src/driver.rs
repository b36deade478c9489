//! Deterministic driving loop on a manual clock.
//!
//! A single FIFO server fed at a fixed arrival rate. The loop calls the bridge
//! the way an enforcement point would and pumps the control loop once per
//! control period.

use std::collections::VecDeque;

use serde::Serialize;

use crate::bridge::ControllerBridge;
use crate::clock::{ManualClock, SimClock};
use crate::config::SimulationSection;

#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub requests: u64,
    pub optional_served: u64,
    pub completed: u64,
    pub mean_response_time: f64,
    pub max_response_time: f64,
    pub control_periods: u64,
    pub final_queue_length: i64,
    pub upstream_info: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Request {
    arrived_at: f64,
    with_optional: bool,
}

enum Step {
    Departure,
    Tick,
    Arrival,
}

pub fn run(
    bridge: &mut ControllerBridge,
    clock: &ManualClock,
    sim: &SimulationSection,
    control_period: f64,
) -> DriverReport {
    let start = clock.now();
    let end = start + sim.duration_s;
    let inter_arrival = 1.0 / sim.arrival_rate;
    let service = |r: &Request| {
        if r.with_optional {
            sim.service_time_s * sim.optional_cost
        } else {
            sim.service_time_s
        }
    };

    let mut next_arrival = start;
    let mut next_tick = start + control_period;
    let mut waiting: VecDeque<Request> = VecDeque::new();
    let mut in_service: Option<(Request, f64)> = None;

    let mut report = DriverReport {
        requests: 0,
        optional_served: 0,
        completed: 0,
        mean_response_time: 0.0,
        max_response_time: 0.0,
        control_periods: 0,
        final_queue_length: 0,
        upstream_info: None,
    };
    let mut rt_sum = 0.0;

    loop {
        let departure_at = in_service.map(|(_, done)| done).unwrap_or(f64::INFINITY);
        let tick_at = if next_tick <= end { next_tick } else { f64::INFINITY };
        let arrival_at = if next_arrival < end { next_arrival } else { f64::INFINITY };

        // Ties resolve as departure, tick, arrival.
        let (t, step) = [
            (departure_at, Step::Departure),
            (tick_at, Step::Tick),
            (arrival_at, Step::Arrival),
        ]
        .into_iter()
        .fold((f64::INFINITY, None), |(best, step), (at, s)| {
            if at < best {
                (at, Some(s))
            } else {
                (best, step)
            }
        });
        let Some(step) = step else { break };
        clock.advance_to(t);

        match step {
            Step::Departure => {
                let Some((req, _)) = in_service.take() else { continue };
                let rt = t - req.arrived_at;
                rt_sum += rt;
                report.max_response_time = report.max_response_time.max(rt);
                report.completed += 1;

                bridge.report_departure(rt, waiting.len() as i64, req.with_optional);

                in_service = waiting.pop_front().map(|next| (next, t + service(&next)));
            }
            Step::Tick => {
                bridge.run_control_loop();
                report.control_periods += 1;
                next_tick += control_period;
            }
            Step::Arrival => {
                let in_system = waiting.len() as i64 + i64::from(in_service.is_some());
                let hypothetical = in_system + 1;
                let with_optional = bridge.admit_with_optional(hypothetical);
                bridge.report_arrival(hypothetical, with_optional);

                report.requests += 1;
                if with_optional {
                    report.optional_served += 1;
                }

                let req = Request {
                    arrived_at: t,
                    with_optional,
                };
                if in_service.is_none() {
                    in_service = Some((req, t + service(&req)));
                } else {
                    waiting.push_back(req);
                }
                next_arrival += inter_arrival;
            }
        }
    }

    if report.completed > 0 {
        report.mean_response_time = rt_sum / report.completed as f64;
    }
    report.final_queue_length = bridge.current_queue_length();
    report.upstream_info = bridge.upstream_info();
    report
}
