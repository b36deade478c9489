//! Policy wire contracts.
//!
//! - `telemetry`: the structured event pushed into a policy on every report
//! - `value`: dynamic values a policy returns (admission replies, setpoint)

pub mod telemetry;
pub mod value;
