//! Operating system updates and machine identity: hostname, timezone,
//! keyboard and locale.

use std::path::Path;
use std::time::Duration;

use super::apt;
use crate::action::{Disposition, StepContext};
use crate::command::Cmd;
use crate::error::Result;
use crate::paths;

const WORDLIST_PACKAGE: &str = "wamerican";

pub fn update_os(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    apt::update_then_upgrade(ctx.host, Duration::from_secs(ctx.config.settle_secs))?;
    Ok(Disposition::Reboot)
}

pub fn install_git(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    apt::install(ctx.host, &["git"])?;
    Ok(Disposition::Continue)
}

/// Provides `/usr/share/dict/words` for generated passphrases.
pub fn install_wordlist(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    apt::install(ctx.host, &[WORDLIST_PACKAGE])?;
    Ok(Disposition::Continue)
}

pub fn install_python_dev(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    apt::install(ctx.host, &["python3-dev"])?;
    Ok(Disposition::Continue)
}

pub fn install_fuse(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    apt::install(ctx.host, &["fuse"])?;
    Ok(Disposition::Continue)
}

/// The new name only takes effect after a reboot.
pub fn change_hostname(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let cfg = ctx.config;
    ctx.host.write_file(
        Path::new(paths::ETC_HOSTNAME),
        format!("{}\n", cfg.hostname).as_bytes(),
        None,
    )?;
    ctx.host.run(&Cmd::new("sed").args([
        "-i".to_string(),
        format!("s/{}/{}/", cfg.previous_hostname, cfg.hostname),
        paths::ETC_HOSTS.to_string(),
    ]))?;
    Ok(Disposition::Reboot)
}

pub fn change_timezone(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    ctx.host.write_file(
        Path::new(paths::ETC_TIMEZONE),
        format!("{}\n", ctx.config.timezone).as_bytes(),
        None,
    )?;
    // tzdata keeps an existing /etc/localtime and ignores /etc/timezone.
    ctx.host.remove_file(Path::new(paths::ETC_LOCALTIME))?;
    ctx.host.run(&dpkg_reconfigure("tzdata"))?;
    Ok(Disposition::Continue)
}

pub fn change_keyboard(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let kb = &ctx.config.keyboard;
    let selections = format!(
        "keyboard-configuration\tkeyboard-configuration/xkb-keymap\tselect\t{code}\n\
         keyboard-configuration\tkeyboard-configuration/layoutcode\tstring\t{code}\n\
         keyboard-configuration\tkeyboard-configuration/layout\tselect\t{name}\n\
         keyboard-configuration\tkeyboard-configuration/variant\tselect\t{name}\n",
        code = kb.layout_code,
        name = kb.layout_name,
    );
    ctx.host
        .run(&Cmd::new("debconf-set-selections").stdin(selections))?;
    ctx.host.run(&dpkg_reconfigure("keyboard-configuration"))?;
    Ok(Disposition::Continue)
}

pub fn change_locale(ctx: &mut StepContext<'_>) -> Result<Disposition> {
    let locale = ctx.config.locale.as_str();
    let entry = locale_gen_entry(locale);
    let selections = format!(
        "locales\tlocales/locales_to_be_generated\tmultiselect\t{entry}\n\
         locales\tlocales/default_environment_locale\tselect\t{locale}\n"
    );
    ctx.host
        .run(&Cmd::new("debconf-set-selections").stdin(selections))?;
    ctx.host.run(&Cmd::new("sed").args([
        "-i".to_string(),
        format!("s/^# {entry}/{entry}/"),
        paths::ETC_LOCALE_GEN.to_string(),
    ]))?;
    ctx.host.run(&dpkg_reconfigure("locales"))?;
    ctx.host
        .run(&Cmd::new("update-locale").arg(format!("LANG={locale}")))?;
    Ok(Disposition::Continue)
}

/// `en_US.UTF-8` -> `en_US.UTF-8 UTF-8`, the form used by `/etc/locale.gen`.
fn locale_gen_entry(locale: &str) -> String {
    let charset = locale.split_once('.').map(|(_, c)| c).unwrap_or("UTF-8");
    format!("{locale} {charset}")
}

fn dpkg_reconfigure(package: &str) -> Cmd {
    Cmd::new("dpkg-reconfigure").args(["-f", "noninteractive", package])
}
