use anyhow::Context;
use clap::Subcommand;
use los_core::service::{RestartTrigger, SystemdService};
use std::path::Path;

#[derive(Subcommand)]
pub enum ServiceSubcommand {
    /// Write and enable the unit that runs `los run` at every boot
    Install {
        #[arg(long)]
        dry_run: bool,
    },

    /// Stop running at boot
    Disable {
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(root: &Path, subcmd: ServiceSubcommand) -> anyhow::Result<()> {
    let config = super::load_config(root, None)?;
    let service = SystemdService::new(config.service.as_str());

    match subcmd {
        ServiceSubcommand::Install { dry_run } => {
            let host = super::host(dry_run, false)?;
            let exe = std::env::current_exe().context("cannot locate the los executable")?;
            let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
            service
                .install(host.as_ref(), &exe, &root)
                .with_context(|| format!("failed to install {}", service.name))?;
            if !dry_run {
                println!(
                    "Installed {}; provisioning starts at the next boot.",
                    service.unit_path().display()
                );
            }
        }
        ServiceSubcommand::Disable { dry_run } => {
            let host = super::host(dry_run, false)?;
            service
                .disable(host.as_ref())
                .with_context(|| format!("failed to disable {}", service.name))?;
        }
    }
    Ok(())
}
