//! brownout-sim
//!
//! Loads a config (or the built-in default), initialises the bridge on the
//! process runtime, runs the deterministic driver, prints the report and
//! metrics, then shuts down. Startup failures exit with status 1.

use std::process::ExitCode;
use std::rc::Rc;

use tracing_subscriber::{fmt, EnvFilter};

use brownout_bridge::clock::ManualClock;
use brownout_bridge::policy::PolicyRegistry;
use brownout_bridge::{config, driver, ControllerBridge};

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path),
        None => config::load_default(),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(op = "main", class = e.class().as_str(), error = %e, "config load failed; aborting");
            return ExitCode::from(1);
        }
    };

    let registry = PolicyRegistry::with_builtins();
    let clock = Rc::new(ManualClock::new(0.0));

    let mut bridge = match ControllerBridge::init(&cfg.controller, &registry, clock.clone()) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(op = "main", class = e.class().as_str(), error = %e, "could not start controller; aborting");
            return ExitCode::from(1);
        }
    };

    tracing::info!(
        policy = %cfg.controller.policy,
        control_period_s = cfg.controller.control_period_s,
        "brownout-sim starting"
    );

    let report = driver::run(&mut bridge, &clock, &cfg.simulation, cfg.controller.control_period_s);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(op = "main", error = %e, "report serialization failed"),
    }
    print!("{}", bridge.metrics().render());

    bridge.shutdown();
    ExitCode::SUCCESS
}
