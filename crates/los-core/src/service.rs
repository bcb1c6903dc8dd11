//! The systemd unit that brings `los` back after each reboot.

use std::path::{Path, PathBuf};

use crate::command::Cmd;
use crate::error::Result;
use crate::host::Host;
use crate::paths;

/// Whatever re-invokes provisioning after a restart.
pub trait RestartTrigger {
    /// Stop further re-invocations. Safe to call more than once.
    fn disable(&self, host: &dyn Host) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SystemdService {
    pub name: String,
}

impl SystemdService {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn unit_path(&self) -> PathBuf {
        paths::unit_path(&self.name)
    }

    /// Unit file running `<exe> run --root <root>` once per boot.
    pub fn render_unit(&self, exe: &Path, root: &Path) -> String {
        format!(
            "[Unit]\n\
             Description=Little-Oven Setup\n\
             Wants=network-online.target\n\
             After=network-online.target\n\
             \n\
             [Service]\n\
             Type=oneshot\n\
             WorkingDirectory={root}\n\
             ExecStart=\"{exe}\" run --root \"{root}\"\n\
             StandardOutput=journal+console\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n",
            exe = exe.display(),
            root = root.display(),
        )
    }

    /// Write the unit and enable it so the next boot starts provisioning.
    pub fn install(&self, host: &dyn Host, exe: &Path, root: &Path) -> Result<()> {
        let unit = self.render_unit(exe, root);
        host.write_file(&self.unit_path(), unit.as_bytes(), Some(0o644))?;
        host.run(&Cmd::new("systemctl").arg("daemon-reload"))?;
        host.run(&Cmd::new("systemctl").args(["enable", self.name.as_str()]))?;
        Ok(())
    }
}

impl RestartTrigger for SystemdService {
    fn disable(&self, host: &dyn Host) -> Result<()> {
        host.run(&Cmd::new("systemctl").args(["disable", self.name.as_str()]))?;
        Ok(())
    }
}
