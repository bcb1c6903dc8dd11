//! The resumable step sequencer.
//!
//! One call to [`Sequencer::run`] is one process invocation. It executes
//! registered steps starting at the checkpoint until either a step asks for a
//! reboot or the checkpoint runs past the last step:
//!
//! ```text
//!            ┌────────────── Continue ──────────────┐
//!            ▼                                      │
//!   lookup(checkpoint) ── found ──▶ announce ▶ execute ▶ advance
//!            │                                      │
//!        not found                               Reboot
//!            ▼                                      ▼
//!   announce, disable trigger            warn, pause, reboot
//!        (Complete)                       (AwaitingRestart)
//! ```
//!
//! A failing action propagates its error before the checkpoint advances, so
//! the same step runs again on the next invocation.

use std::time::Duration;

use serde::Serialize;

use crate::action::{Disposition, StepContext};
use crate::error::Result;
use crate::registry::StepRegistry;
use crate::service::RestartTrigger;
use crate::step::StepCounter;

pub const COMPLETION_MESSAGE: &str = "Little-Oven installed.  Disabling the los service.";
pub const REBOOT_MESSAGE: &str = "REBOOT!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A step asked for a reboot and the reboot was issued.
    Rebooting { executed: Vec<u32> },
    /// Every step has run and the restart trigger is disabled.
    Complete { executed: Vec<u32> },
}

impl Outcome {
    pub fn executed(&self) -> &[u32] {
        match self {
            Outcome::Rebooting { executed } | Outcome::Complete { executed } => executed,
        }
    }
}

pub struct Sequencer<'a> {
    registry: &'a StepRegistry,
    trigger: &'a dyn RestartTrigger,
    reboot_delay: Duration,
}

impl<'a> Sequencer<'a> {
    pub fn new(registry: &'a StepRegistry, trigger: &'a dyn RestartTrigger) -> Self {
        Self {
            registry,
            trigger,
            reboot_delay: Duration::from_secs(5),
        }
    }

    /// Pause between the reboot warning and the reboot itself, so the
    /// broadcast reaches attached terminals.
    pub fn reboot_delay(mut self, delay: Duration) -> Self {
        self.reboot_delay = delay;
        self
    }

    pub fn run(&self, counter: &mut StepCounter, ctx: &mut StepContext<'_>) -> Result<Outcome> {
        let mut executed = Vec::new();

        loop {
            let step = counter.get_current_step()?;
            let Some(action) = self.registry.get(step) else {
                ctx.host.broadcast(COMPLETION_MESSAGE)?;
                self.trigger.disable(ctx.host)?;
                tracing::info!(steps = executed.len(), "provisioning complete");
                return Ok(Outcome::Complete { executed });
            };

            if action.is_retired() {
                tracing::debug!(step, description = action.description(), "retired step");
            } else {
                ctx.host
                    .broadcast(&format!("Step #{step}: {}", action.description()))?;
            }

            let disposition = action.execute(ctx)?;
            counter.increment_current_step()?;
            executed.push(step);

            if disposition == Disposition::Reboot {
                break;
            }
        }

        ctx.host.broadcast(REBOOT_MESSAGE)?;
        ctx.host.pause(self.reboot_delay);
        ctx.host.reboot()?;
        Ok(Outcome::Rebooting { executed })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
