//! Developer tooling: pip, rustup, VeraCrypt and the login-time check that
//! finishes the interactive installs.

use std::path::Path;

use crate::action::{Disposition, StepContext};
use crate::command::Cmd;
use crate::error::Result;
use crate::paths;

const GET_PIP_URL: &str = "https://bootstrap.pypa.io/get-pip.py";
const VERACRYPT_STAGING: &str = "veracrypt-staging";

const LOGIN_CHECK: &str = "#!/bin/bash\n\
if [ ! -e $HOME/.cargo ]; then\n    rustup.sh -y\nfi\n\
if ! command -v veracrypt; then\n    veracrypt-setup\nfi\n";

pub fn install_pip(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let script = ctx.root.join("get-pip.py");
    ctx.host.download(GET_PIP_URL, &script)?;
    ctx.host
        .run(&Cmd::new("python3").arg(script.to_string_lossy()))?;
    ctx.host.remove_file(&script)?;
    Ok(Disposition::Continue)
}

/// A missing `los.json` on the server is fine; anything else is not.
pub fn fetch_global_config(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let url = ctx.config.global_config_url();
    ctx.global.fetch(ctx.host, &url)?;
    Ok(Disposition::Continue)
}

pub fn stage_rustup(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let dest = Path::new(paths::RUSTUP_SCRIPT);
    ctx.host.download(&ctx.config.rustup_url, dest)?;
    ctx.host.set_mode(dest, 0o755)?;
    Ok(Disposition::Continue)
}

pub fn stage_veracrypt(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let vc = &ctx.config.veracrypt;
    let staging = ctx.root.join(VERACRYPT_STAGING);
    let tarball = staging.join(tarball_name(&vc.url));

    ctx.host
        .make_dir(&staging, &ctx.config.account, 0o755, true)?;
    ctx.host.download(&vc.url, &tarball)?;
    ctx.host.run(&Cmd::new("tar").args([
        "xjf".to_string(),
        tarball.to_string_lossy().into_owned(),
        "-C".to_string(),
        staging.to_string_lossy().into_owned(),
    ]))?;
    ctx.host.run(&Cmd::new("cp").args([
        staging.join(&vc.setup_name).to_string_lossy().into_owned(),
        paths::VERACRYPT_SETUP.to_string(),
    ]))?;
    ctx.host.run(&Cmd::new("rm").args([
        "-rf".to_string(),
        staging.to_string_lossy().into_owned(),
    ]))?;
    Ok(Disposition::Continue)
}

pub fn install_login_check(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    ctx.host.write_file(
        Path::new(paths::PROFILE_CHECK_SCRIPT),
        LOGIN_CHECK.as_bytes(),
        Some(0o755),
    )?;
    Ok(Disposition::Continue)
}

fn tarball_name(url: &str) -> &str {
    match url.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => "veracrypt-setup.tar.bz2",
    }
}
