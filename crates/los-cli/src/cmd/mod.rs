pub mod config;
pub mod reset;
pub mod run;
pub mod service;
pub mod status;
pub mod steps;

use anyhow::Context;
use los_core::config::Config;
use los_core::host::{DryRunHost, Host, LocalHost};
use std::path::Path;

/// `los.yaml` from `root` with the `--base-url` override applied.
pub fn load_config(root: &Path, base_url: Option<&str>) -> anyhow::Result<Config> {
    let mut config = Config::load(root)
        .with_context(|| format!("failed to load config from {}", root.display()))?;
    if let Some(url) = base_url {
        config.base_url = url.to_string();
    }
    Ok(config)
}

/// `json` keeps dry-run notes off stdout so it stays parseable.
pub fn host(dry_run: bool, json: bool) -> anyhow::Result<Box<dyn Host>> {
    if dry_run && json {
        Ok(Box::new(DryRunHost::log_only()))
    } else if dry_run {
        Ok(Box::new(DryRunHost::new()))
    } else {
        Ok(Box::new(LocalHost::new().context("failed to set up HTTP client")?))
    }
}
