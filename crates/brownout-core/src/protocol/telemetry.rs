//! Telemetry events pushed into a policy.

use serde::{Deserialize, Serialize};

/// One structured telemetry event (`reportData` on the policy side).
///
/// `extra1`/`extra2` are reserved slots of the wire shape; the bridge always
/// sends `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub is_arrival: bool,
    pub response_time: f64,
    pub queue_length: i64,
    pub extra1: f64,
    pub extra2: f64,
    pub with_optional: bool,
}

impl TelemetryEvent {
    /// Fixed-shape event sent ahead of every admission query.
    ///
    /// Policies use it to count arrivals independently of real reporting.
    pub const PROBE: TelemetryEvent = TelemetryEvent {
        is_arrival: true,
        response_time: 0.0,
        queue_length: 0,
        extra1: 0.0,
        extra2: 0.0,
        with_optional: false,
    };

    /// A real arrival report. `queue_length` counts the arriving request, so it
    /// is at least 1; `arrival(0, false)` would be indistinguishable from
    /// [`TelemetryEvent::PROBE`].
    pub fn arrival(queue_length: i64, with_optional: bool) -> Self {
        Self {
            is_arrival: true,
            queue_length,
            with_optional,
            ..Self::PROBE
        }
    }

    pub fn departure(response_time: f64, queue_length: i64, with_optional: bool) -> Self {
        Self {
            is_arrival: false,
            response_time,
            queue_length,
            extra1: 0.0,
            extra2: 0.0,
            with_optional,
        }
    }

    /// True if this is exactly the probe shape.
    pub fn is_probe(&self) -> bool {
        *self == Self::PROBE
    }

    /// Label used by metrics and logs.
    pub fn kind(&self) -> &'static str {
        if self.is_probe() {
            "probe"
        } else if self.is_arrival {
            "arrival"
        } else {
            "departure"
        }
    }
}
