use std::collections::HashMap;
use std::rc::Rc;

use dashmap::DashMap;

use brownout_core::error::{BrownoutError, Result};
use brownout_core::PolicyResult;

use super::static_setpoint;
use super::{Policy, PolicyOptions};
use crate::scheduler::SchedulerFacade;

/// Constructor-like entry point: `(sim, identity, options) -> instance`.
pub type Constructor =
    Rc<dyn Fn(SchedulerFacade, &str, &PolicyOptions) -> PolicyResult<Box<dyn Policy>>>;

#[derive(Default)]
struct PolicyModule {
    entries: HashMap<String, Constructor>,
}

/// Named, path-resolvable policy modules.
#[derive(Default)]
pub struct PolicyRegistry {
    modules: DashMap<String, PolicyModule>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self {
            modules: DashMap::new(),
        }
    }

    /// Registry preloaded with the policies shipped in this crate.
    pub fn with_builtins() -> Self {
        let reg = Self::new();
        reg.register(
            static_setpoint::MODULE,
            static_setpoint::ENTRY_POINT,
            Rc::new(static_setpoint::new_instance),
        );
        reg
    }

    /// Make a module resolvable without any entry point.
    pub fn register_module(&self, module: &str) {
        self.modules.entry(module.to_string()).or_default();
    }

    pub fn register(&self, module: &str, entry: &str, ctor: Constructor) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .entries
            .insert(entry.to_string(), ctor);
    }

    pub fn registered_modules(&self) -> Vec<String> {
        let mut out: Vec<String> = self.modules.iter().map(|e| e.key().clone()).collect();
        out.sort();
        out
    }

    /// Resolve `module.entry` to its constructor.
    pub fn resolve(&self, module: &str, entry: &str) -> Result<Constructor> {
        let m = self
            .modules
            .get(module)
            .ok_or_else(|| BrownoutError::ModuleNotFound(module.to_string()))?;
        m.value()
            .entries
            .get(entry)
            .cloned()
            .ok_or_else(|| BrownoutError::EntryPointMissing {
                module: module.to_string(),
                entry: entry.to_string(),
            })
    }
}
