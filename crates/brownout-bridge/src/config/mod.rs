//! Bridge config loader (strict parsing).

pub mod schema;

use std::fs;

use brownout_core::error::{BrownoutError, Result};

pub use schema::{BrownoutConfig, ControllerSection, SimulationSection};

/// Configuration used when no file is given.
pub const DEFAULT_CONFIG: &str = r#"
version: 1
controller:
  policy: static-setpoint
  entry_point: new_instance
  identity: controller0
  control_period_s: 0.5
  params:
    setpoint: "10"
"#;

pub fn load_from_file(path: &str) -> Result<BrownoutConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BrownoutError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BrownoutConfig> {
    let cfg: BrownoutConfig = serde_yaml::from_str(s)
        .map_err(|e| BrownoutError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_default() -> Result<BrownoutConfig> {
    load_from_str(DEFAULT_CONFIG)
}
