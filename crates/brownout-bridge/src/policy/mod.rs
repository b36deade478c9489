//! Policy layer: the capability interface a pluggable policy satisfies, the
//! registry it is loaded from, and the handle that owns one live instance.

pub mod handle;
pub mod registry;
pub mod static_setpoint;

use std::collections::BTreeMap;

use brownout_core::protocol::telemetry::TelemetryEvent;
use brownout_core::protocol::value::PolicyValue;
use brownout_core::{PolicyError, PolicyResult};

pub use handle::PolicyHandle;
pub use registry::{Constructor, PolicyRegistry};

/// What the bridge calls on a loaded policy instance.
///
/// Implementations that defer work through the scheduler facade typically keep
/// their state behind `Rc<RefCell<_>>` so the callback can reach it.
pub trait Policy {
    /// `reportData`: one telemetry event.
    fn report_data(&mut self, event: &TelemetryEvent) -> PolicyResult<()>;

    /// `withOptional`: reply whose first element is the admission decision.
    fn with_optional(&mut self, queue_length: i64) -> PolicyResult<Vec<PolicyValue>>;

    /// `queueLengthSetpoint` attribute, if the policy exposes one.
    fn queue_length_setpoint(&self) -> Option<PolicyValue>;
}

/// Load-time options handed to the policy constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOptions {
    pub control_period: f64,
    pub params: BTreeMap<String, String>,
}

impl PolicyOptions {
    pub fn new(control_period: f64) -> Self {
        Self {
            control_period,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Parse an integer parameter, `Ok(None)` when absent.
    pub fn param_i64(&self, key: &str) -> PolicyResult<Option<i64>> {
        match self.params.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                PolicyError::BadArgument(format!("parameter {key} must be an integer ({raw} given)"))
            }),
        }
    }
}
