#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use brownout_bridge::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
controller:
  policy: "static-setpoint"
  control_periods: 0.5 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.class().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.controller.policy, "static-setpoint");
    assert_eq!(cfg.controller.entry_point, "new_instance");
    assert_eq!(cfg.controller.control_period_s, 0.5);
    assert!(cfg.controller.params.is_empty());
}

#[test]
fn default_config_is_valid() {
    let cfg = config::load_default().expect("built-in config must parse");
    assert_eq!(cfg.controller.identity, "controller0");
    assert_eq!(cfg.controller.params.get("setpoint").map(String::as_str), Some("10"));

    let opts = cfg.controller.policy_options();
    assert_eq!(opts.control_period, 0.5);
    assert_eq!(opts.param_i64("setpoint").unwrap(), Some(10));
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, brownout_core::BrownoutError::UnsupportedVersion));
    assert_eq!(err.class().as_str(), "CONFIG");
}

#[test]
fn rejects_out_of_range_control_period() {
    for period in ["0", "-0.5", "120"] {
        let doc = format!("version: 1\ncontroller:\n  control_period_s: {period}\n");
        let err = config::load_from_str(&doc).expect_err("must fail");
        assert!(err.to_string().contains("control_period_s"), "period={period}");
    }
}

#[test]
fn rejects_bad_simulation_section() {
    let bad = r#"
version: 1
simulation:
  optional_cost: 0.5
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("optional_cost"));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = config::load_from_file("does-not-exist.yaml").expect_err("must fail");
    assert_eq!(err.class().as_str(), "CONFIG");
}
