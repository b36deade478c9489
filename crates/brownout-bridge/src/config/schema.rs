use std::collections::BTreeMap;

use brownout_core::error::{BrownoutError, Result};
use serde::Deserialize;

use crate::policy::PolicyOptions;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrownoutConfig {
    pub version: u32,

    #[serde(default)]
    pub controller: ControllerSection,

    #[serde(default)]
    pub simulation: SimulationSection,
}

impl BrownoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BrownoutError::UnsupportedVersion);
        }

        self.controller.validate()?;
        self.simulation.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerSection {
    #[serde(default = "default_policy")]
    pub policy: String,

    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    #[serde(default = "default_identity")]
    pub identity: String,

    /// Must match the cadence at which the driving loop pumps the bridge.
    #[serde(default = "default_control_period_s")]
    pub control_period_s: f64,

    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            entry_point: default_entry_point(),
            identity: default_identity(),
            control_period_s: default_control_period_s(),
            params: BTreeMap::new(),
        }
    }
}

impl ControllerSection {
    pub fn validate(&self) -> Result<()> {
        if self.policy.trim().is_empty() {
            return Err(BrownoutError::Config("controller.policy must not be empty".into()));
        }
        if self.entry_point.trim().is_empty() {
            return Err(BrownoutError::Config("controller.entry_point must not be empty".into()));
        }
        if self.identity.trim().is_empty() {
            return Err(BrownoutError::Config("controller.identity must not be empty".into()));
        }
        if !(self.control_period_s > 0.0 && self.control_period_s <= 60.0) {
            return Err(BrownoutError::Config(
                "controller.control_period_s must be in (0, 60]".into(),
            ));
        }
        Ok(())
    }

    pub fn policy_options(&self) -> PolicyOptions {
        PolicyOptions {
            control_period: self.control_period_s,
            params: self.params.clone(),
        }
    }
}

fn default_policy() -> String {
    "static-setpoint".into()
}
fn default_entry_point() -> String {
    "new_instance".into()
}
fn default_identity() -> String {
    "controller0".into()
}
fn default_control_period_s() -> f64 {
    0.5
}

/// Parameters of the bundled driver loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_duration_s")]
    pub duration_s: f64,

    /// Requests per simulated second.
    #[serde(default = "default_arrival_rate")]
    pub arrival_rate: f64,

    #[serde(default = "default_service_time_s")]
    pub service_time_s: f64,

    /// Service time multiplier when the optional feature is served.
    #[serde(default = "default_optional_cost")]
    pub optional_cost: f64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            duration_s: default_duration_s(),
            arrival_rate: default_arrival_rate(),
            service_time_s: default_service_time_s(),
            optional_cost: default_optional_cost(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.duration_s > 0.0 && self.duration_s.is_finite()) {
            return Err(BrownoutError::Config("simulation.duration_s must be positive".into()));
        }
        if !(self.arrival_rate > 0.0 && self.arrival_rate.is_finite()) {
            return Err(BrownoutError::Config("simulation.arrival_rate must be positive".into()));
        }
        if !(self.service_time_s > 0.0 && self.service_time_s.is_finite()) {
            return Err(BrownoutError::Config("simulation.service_time_s must be positive".into()));
        }
        if !(self.optional_cost >= 1.0 && self.optional_cost.is_finite()) {
            return Err(BrownoutError::Config("simulation.optional_cost must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_duration_s() -> f64 {
    10.0
}
fn default_arrival_rate() -> f64 {
    50.0
}
fn default_service_time_s() -> f64 {
    0.015
}
fn default_optional_cost() -> f64 {
    2.0
}
