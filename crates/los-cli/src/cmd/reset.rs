use crate::output::print_json;
use los_core::paths;
use los_core::step::StepCounter;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let path = paths::step_path(root);
    let removed = StepCounter::discard(&path)?;
    tracing::info!(path = %path.display(), removed, "checkpoint reset");

    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else if removed {
        println!("Removed {}; the next run starts at step 1.", path.display());
    } else {
        println!("No checkpoint at {}; nothing to reset.", path.display());
    }
    Ok(())
}
