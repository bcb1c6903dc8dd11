use crate::output::print_json;
use anyhow::Context;
use los_core::step::StepCounter;
use los_core::{paths, steps};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Status {
    step: u32,
    total: u32,
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    retired: bool,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut counter = StepCounter::open(paths::step_path(root));
    let step = counter
        .get_current_step()
        .context("failed to read the checkpoint")?;
    let registry = steps::little_oven();
    let action = registry.get(step);

    let status = Status {
        step,
        total: registry.last_step(),
        complete: action.is_none(),
        description: action.map(|a| a.description().to_string()),
        retired: action.is_some_and(|a| a.is_retired()),
    };

    if json {
        return print_json(&status);
    }
    match &status.description {
        Some(desc) => {
            let note = if status.retired { " (retired)" } else { "" };
            println!("Step {} of {}: {desc}{note}", status.step, status.total);
        }
        None => println!("Complete: all {} steps have run.", status.total),
    }
    Ok(())
}
