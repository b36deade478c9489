//! Minimal metrics registry for the admission bridge.
//!
//! Counter/gauge types with dynamic labels backed by `DashMap`. Labels are
//! flattened into sorted key vectors to keep deterministic ordering.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum across all label sets.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

/// Unlabelled signed gauge.
#[derive(Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn set(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge\n{} {}", name, name, self.get());
    }
}

#[derive(Default)]
pub struct BridgeMetrics {
    /// Admission decisions by `outcome` (optional, plain, fallback).
    pub admissions: CounterVec,
    /// Telemetry events pushed into the policy by `kind`.
    pub telemetry_events: CounterVec,
    /// Recoverable policy failures by `op`.
    pub policy_errors: CounterVec,
    pub control_loop_runs: CounterVec,
    pub callbacks_replaced: CounterVec,
    pub queue_length: Gauge,
}

impl BridgeMetrics {
    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.admissions.render("brownout_admissions_total", &mut out);
        self.telemetry_events.render("brownout_telemetry_events_total", &mut out);
        self.policy_errors.render("brownout_policy_errors_total", &mut out);
        self.control_loop_runs.render("brownout_control_loop_runs_total", &mut out);
        self.callbacks_replaced.render("brownout_callbacks_replaced_total", &mut out);
        self.queue_length.render("brownout_queue_length", &mut out);
        out
    }
}
