//! APT package manager calls.

use std::time::Duration;

use crate::command::Cmd;
use crate::error::Result;
use crate::host::Host;

fn apt_get() -> Cmd {
    Cmd::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive")
}

/// Refresh the package lists and upgrade everything. Waits `settle` first so
/// networking has a chance to come up after a reboot.
pub fn update_then_upgrade(host: &dyn Host, settle: Duration) -> Result<()> {
    host.pause(settle);
    host.broadcast("Update the APT package list.")?;
    host.run(&apt_get().args(["-y", "update"]))?;
    host.broadcast("Upgrade APT packages.")?;
    host.run(&apt_get().args(["-y", "upgrade"]))?;
    Ok(())
}

pub fn install(host: &dyn Host, packages: &[&str]) -> Result<()> {
    host.run(&apt_get().args(["-y", "install"]).args(packages.iter().copied()))?;
    Ok(())
}
