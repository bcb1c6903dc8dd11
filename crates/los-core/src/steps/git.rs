//! Git identity and GitHub ssh access for the developer account.

use std::path::Path;

use crate::action::{Disposition, StepContext};
use crate::command::Cmd;
use crate::error::Result;

const GITHUB_SSH_HOST: &str = "Host github.com";

const GITHUB_SSH_BLOCK: &str = concat!(
    "Host github.com\n",
    "        User git\n",
    "        Hostname github.com\n",
    "        PreferredAuthentications publickey\n",
    "        IdentityFile ~/.ssh/github/id_rsa\n",
);

/// Configure git for this device when `los.json` has a `github` entry for
/// its hardware id. Devices without one are left alone.
pub fn configure_git(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let Some(hwid) = ctx.host.hardware_id()? else {
        tracing::info!("no hardware id; skipping git configuration");
        return Ok(Disposition::Continue);
    };
    let Some(github) = ctx.global.github(&hwid).cloned() else {
        tracing::info!(hwid, "no github entry for this device");
        return Ok(Disposition::Continue);
    };

    let host = ctx.host;
    let account = ctx.config.account.as_str();

    for (key, value) in [
        ("user.name", github.name()),
        ("user.email", github.email()),
        ("core.editor", github.editor()),
    ] {
        host.run(&Cmd::new("git").args(["config", "--system", key, value]))?;
    }

    let ssh_dir = host.home_dir(account)?.join(".ssh");
    host.make_dir(&ssh_dir, account, 0o700, false)?;

    let ssh_config = ssh_dir.join("config");
    let existing = host.read_file(&ssh_config)?.unwrap_or_default();
    if !has_github_host(&existing) {
        let mut block = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(GITHUB_SSH_BLOCK);
        host.append_file(&ssh_config, &block)?;
    }
    host.chown(&ssh_config, account)?;

    let key_dir = ssh_dir.join("github");
    host.make_dir(&key_dir, account, 0o700, false)?;

    let key = key_dir.join("id_rsa");
    let generated = if host.exists(&key) {
        tracing::info!(key = %key.display(), "ssh key already present");
        false
    } else {
        generate_key(ctx, &key, github.email())?;
        true
    };

    // ssh-keygen runs as root, so ownership is reapplied on every run.
    for path in [key.clone(), key.with_extension("pub")] {
        if generated || host.exists(&path) {
            host.chown(&path, account)?;
        }
    }
    Ok(Disposition::Continue)
}

fn generate_key(ctx: &StepContext<'_>, key: &Path, email: &str) -> Result<()> {
    ctx.host.run(&Cmd::new("ssh-keygen").args([
        "-t".to_string(),
        "rsa".to_string(),
        "-C".to_string(),
        email.to_string(),
        "-b".to_string(),
        "4096".to_string(),
        "-N".to_string(),
        String::new(),
        "-f".to_string(),
        key.to_string_lossy().into_owned(),
    ]))?;
    Ok(())
}

fn has_github_host(ssh_config: &str) -> bool {
    ssh_config.lines().any(|l| l.trim() == GITHUB_SSH_HOST)
}
