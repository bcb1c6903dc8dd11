use crate::output::print_json;
use anyhow::Context;
use los_core::action::StepContext;
use los_core::global_config::GlobalConfig;
use los_core::sequencer::{Outcome, Sequencer};
use los_core::service::SystemdService;
use los_core::step::StepCounter;
use los_core::{paths, steps};
use std::path::Path;
use std::time::Duration;

pub fn run(root: &Path, base_url: Option<&str>, dry_run: bool, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root, base_url)?;
    config.ensure_valid()?;
    let host = super::host(dry_run, json)?;

    let step_path = paths::step_path(root);
    let mut counter = if dry_run {
        StepCounter::detached(step_path)
    } else {
        StepCounter::open(step_path)
    };

    let mut global = GlobalConfig::load(host.as_ref(), paths::global_config_path(root))
        .context("failed to load global configuration")?;
    let mut ctx = StepContext {
        host: host.as_ref(),
        config: &config,
        global: &mut global,
        root,
    };

    let registry = steps::little_oven();
    let trigger = SystemdService::new(config.service.as_str());
    let outcome = Sequencer::new(&registry, &trigger)
        .reboot_delay(Duration::from_secs(config.reboot_delay_secs))
        .run(&mut counter, &mut ctx)?;

    if json {
        print_json(&outcome)?;
    } else if dry_run {
        match &outcome {
            Outcome::Rebooting { executed } => {
                println!("Dry run stopped at reboot after steps {executed:?}.")
            }
            Outcome::Complete { executed } => {
                println!("Dry run complete after steps {executed:?}.")
            }
        }
    }
    Ok(())
}
