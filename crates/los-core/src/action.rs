//! The unit of provisioning work.
//!
//! An action does one job and reports whether the machine has to reboot
//! before the next step can run. Actions hold no progress of their own: if
//! the process dies mid-action the whole action runs again on the next
//! invocation, so every action must be safe to repeat.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::global_config::GlobalConfig;
use crate::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Go straight on to the next step in this process.
    Continue,
    /// Stop here; the next step runs after a reboot.
    Reboot,
}

/// What an action gets to work with. The step counter is deliberately not
/// here: only the sequencer advances it.
pub struct StepContext<'a> {
    pub host: &'a dyn Host,
    pub config: &'a Config,
    pub global: &'a mut GlobalConfig,
    /// Working root holding `los.step`, `los.json` and scratch files.
    pub root: &'a Path,
}

pub trait Action {
    fn description(&self) -> &str;

    fn execute(&self, ctx: &mut StepContext<'_>) -> Result<Disposition>;

    /// Retired steps keep their number but do nothing.
    fn is_retired(&self) -> bool {
        false
    }
}

/// A step that used to do something and now only holds its number, so the
/// steps after it keep theirs.
#[derive(Debug, Clone)]
pub struct Retired {
    description: String,
}

impl Retired {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl Action for Retired {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&self, _ctx: &mut StepContext<'_>) -> Result<Disposition> {
        Ok(Disposition::Continue)
    }

    fn is_retired(&self) -> bool {
        true
    }
}

/// An action built from a closure.
pub struct FnAction<F> {
    description: String,
    run: F,
}

impl<F> FnAction<F>
where
    F: Fn(&mut StepContext<'_>) -> Result<Disposition>,
{
    pub fn new(description: impl Into<String>, run: F) -> Self {
        Self {
            description: description.into(),
            run,
        }
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn(&mut StepContext<'_>) -> Result<Disposition>,
{
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&self, ctx: &mut StepContext<'_>) -> Result<Disposition> {
        (self.run)(ctx)
    }
}
