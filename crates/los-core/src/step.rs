//! Durable step counter.
//!
//! The counter holds the 1-based number of the next step to execute. It is
//! stored as plain decimal text in `los.step`; a missing file means nothing
//! has run yet. The file is read at most once per process and every
//! increment is written through before the next step starts.

use crate::error::{LosError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct StepCounter {
    path: PathBuf,
    current: Option<u32>,
    persist: bool,
}

impl StepCounter {
    /// A counter backed by `path`. Nothing is read until the first access.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
            persist: true,
        }
    }

    /// A counter that reads `path` like [`StepCounter::open`] but keeps
    /// increments in memory. Used for dry runs.
    pub fn detached(path: impl Into<PathBuf>) -> Self {
        Self {
            persist: false,
            ..Self::open(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_current_step(&mut self) -> Result<u32> {
        if let Some(step) = self.current {
            return Ok(step);
        }
        let step = read_step(&self.path)?;
        self.current = Some(step);
        Ok(step)
    }

    /// Advance by one and write the new value through. Returns the new step.
    pub fn increment_current_step(&mut self) -> Result<u32> {
        let next = self.get_current_step()? + 1;
        if self.persist {
            crate::io::atomic_write(&self.path, next.to_string().as_bytes())?;
        }
        self.current = Some(next);
        tracing::debug!(step = next, path = %self.path.display(), "checkpoint advanced");
        Ok(next)
    }

    /// Operator reset: remove the backing file so the next run starts at
    /// step 1. Returns false if there was no checkpoint.
    pub fn discard(path: &Path) -> Result<bool> {
        crate::io::remove_if_exists(path)
    }
}

fn read_step(path: &Path) -> Result<u32> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
        Err(e) => return Err(e.into()),
    };
    match text.trim().parse::<u32>() {
        Ok(step) if step >= 1 => Ok(step),
        _ => Err(LosError::CorruptCheckpoint {
            path: path.to_path_buf(),
            content: text,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
