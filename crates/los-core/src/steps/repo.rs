//! The Little Oven checkout and its cache directory.

use std::path::PathBuf;

use crate::action::{Disposition, StepContext};
use crate::command::Cmd;
use crate::error::{LosError, Result};

pub fn clone_little_oven(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let host = ctx.host;
    let cfg = ctx.config;
    let account = cfg.account.as_str();
    let dest = checkout_dir(ctx)?;
    let dest_str = dest.to_string_lossy().into_owned();

    if host.exists(&dest.join(".git")) {
        tracing::info!(dest = %dest.display(), "already cloned");
    } else {
        host.run(&Cmd::new("git").args(["clone", cfg.repository.url.as_str(), dest_str.as_str()]))?;
    }

    let checkout = Cmd::new("git")
        .args(["checkout", "-t", "remotes/origin/master"])
        .current_dir(&dest);
    match host.run(&checkout) {
        Ok(_) => {}
        Err(LosError::CommandFailed { stderr, .. }) if stderr.contains("already exists") => {
            tracing::debug!("tracking branch already exists");
        }
        Err(e) => return Err(e),
    }

    host.run(
        &Cmd::new("git")
            .args(["remote", "set-url", "origin", cfg.repository.push_url.as_str()])
            .current_dir(&dest),
    )?;

    let requirements = dest.join("requirements.txt");
    if host.exists(&requirements) {
        host.run(&Cmd::new("pip").args([
            "install".to_string(),
            "-U".to_string(),
            "-r".to_string(),
            requirements.to_string_lossy().into_owned(),
        ]))?;
    }

    host.run(&Cmd::new("chown").args([
        "-R".to_string(),
        format!("{account}:{account}"),
        dest_str,
    ]))?;

    host.make_dir(&cfg.cache_dir, account, 0o755, true)?;
    Ok(Disposition::Continue)
}

fn checkout_dir(ctx: &StepContext<'_>) -> Result<PathBuf> {
    match &ctx.config.repository.dest {
        Some(dest) => Ok(dest.clone()),
        None => Ok(ctx.host.home_dir(&ctx.config.account)?.join("Little-Oven")),
    }
}
