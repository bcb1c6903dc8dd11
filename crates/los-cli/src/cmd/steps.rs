use crate::output::{print_json, print_table};
use anyhow::Context;
use los_core::step::StepCounter;
use los_core::{paths, steps};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum State {
    Done,
    Current,
    Pending,
}

impl State {
    fn label(&self) -> &'static str {
        match self {
            State::Done => "done",
            State::Current => "current",
            State::Pending => "pending",
        }
    }
}

#[derive(Serialize)]
struct StepRow {
    step: u32,
    description: String,
    retired: bool,
    state: State,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let current = StepCounter::open(paths::step_path(root))
        .get_current_step()
        .context("failed to read the checkpoint")?;
    let registry = steps::little_oven();

    let rows: Vec<StepRow> = registry
        .iter()
        .map(|(step, action)| StepRow {
            step,
            description: action.description().to_string(),
            retired: action.is_retired(),
            state: match step.cmp(&current) {
                Ordering::Less => State::Done,
                Ordering::Equal => State::Current,
                Ordering::Greater => State::Pending,
            },
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.step.to_string(),
                r.state.label().to_string(),
                if r.retired { "retired".into() } else { String::new() },
                r.description.clone(),
            ]
        })
        .collect();
    print_table(&["#", "STATE", "", "DESCRIPTION"], &table);
    Ok(())
}
