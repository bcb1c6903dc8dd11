//! The machine being provisioned.
//!
//! Steps never touch the OS directly; they go through [`Host`]. [`LocalHost`]
//! does the real work, [`DryRunHost`] prints what would be done.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::account::{self, Account};
use crate::command::{self, Cmd, CmdOutput};
use crate::error::Result;
use crate::{fetch, hwid, paths};

pub trait Host {
    /// Run a command to completion; non-zero exit is an error.
    fn run(&self, cmd: &Cmd) -> Result<CmdOutput>;

    /// Replace `path` with `contents`, then apply `mode` if given.
    fn write_file(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()>;

    fn append_file(&self, path: &Path, text: &str) -> Result<()>;

    /// `None` when the file does not exist.
    fn read_file(&self, path: &Path) -> Result<Option<String>>;

    /// Remove a file; a missing file is fine.
    fn remove_file(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Create a directory owned by `owner` with `mode`. Existing directories
    /// get ownership and mode reapplied.
    fn make_dir(&self, path: &Path, owner: &str, mode: u32, parents: bool) -> Result<()>;

    fn chown(&self, path: &Path, owner: &str) -> Result<()>;

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;

    /// Stream `url` into `dest`. Non-2xx is [`crate::LosError::HttpStatus`].
    fn download(&self, url: &str, dest: &Path) -> Result<()>;

    fn home_dir(&self, account: &str) -> Result<PathBuf>;

    fn hardware_id(&self) -> Result<Option<String>>;

    /// Tell every logged-in terminal, and the log.
    fn broadcast(&self, text: &str) -> Result<()>;

    fn pause(&self, duration: Duration);

    fn reboot(&self) -> Result<()> {
        self.run(&Cmd::new("reboot")).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// LocalHost
// ---------------------------------------------------------------------------

pub struct LocalHost {
    client: Client,
    sys_class_net: PathBuf,
}

impl LocalHost {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: fetch::client()?,
            sys_class_net: PathBuf::from(paths::SYS_CLASS_NET),
        })
    }
}

impl Host for LocalHost {
    fn run(&self, cmd: &Cmd) -> Result<CmdOutput> {
        command::run(cmd)
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()> {
        match mode {
            Some(mode) => crate::io::atomic_write_mode(path, contents, mode),
            None => Ok(std::fs::write(path, contents)?),
        }
    }

    fn append_file(&self, path: &Path, text: &str) -> Result<()> {
        crate::io::append_text(path, text)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        read_optional(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        crate::io::remove_if_exists(path).map(|_| ())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn make_dir(&self, path: &Path, owner: &str, mode: u32, parents: bool) -> Result<()> {
        Account::lookup(owner)?.make_dir(path, mode, parents)
    }

    fn chown(&self, path: &Path, owner: &str) -> Result<()> {
        Account::lookup(owner)?.chown(path)
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        account::set_mode(path, mode)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        fetch::download(&self.client, url, dest)
    }

    fn home_dir(&self, account: &str) -> Result<PathBuf> {
        Ok(Account::lookup(account)?.home)
    }

    fn hardware_id(&self) -> Result<Option<String>> {
        hwid::hardware_id(&self.sys_class_net)
    }

    fn broadcast(&self, text: &str) -> Result<()> {
        tracing::info!("{text}");
        if which::which("wall").is_err() {
            tracing::warn!("wall not found on PATH; message logged only");
            return Ok(());
        }
        command::run(&Cmd::new("wall").arg(text)).map(|_| ())
    }

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// DryRunHost
// ---------------------------------------------------------------------------

/// Prints each change instead of making it. Reads still hit the real
/// filesystem so checks for prior completion behave as they would for real.
pub struct DryRunHost {
    sys_class_net: PathBuf,
    log_only: bool,
}

impl DryRunHost {
    /// Notes and broadcasts go to stdout.
    pub fn new() -> Self {
        Self {
            sys_class_net: PathBuf::from(paths::SYS_CLASS_NET),
            log_only: false,
        }
    }

    /// Notes and broadcasts go to the log only, leaving stdout for
    /// machine-readable output.
    pub fn log_only() -> Self {
        Self {
            log_only: true,
            ..Self::new()
        }
    }

    fn note(&self, what: impl std::fmt::Display) {
        if self.log_only {
            tracing::info!("[dry-run] {what}");
        } else {
            println!("[dry-run] {what}");
        }
    }
}

impl Default for DryRunHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for DryRunHost {
    fn run(&self, cmd: &Cmd) -> Result<CmdOutput> {
        match &cmd.cwd {
            Some(dir) => self.note(format_args!("(in {}) {cmd}", dir.display())),
            None => self.note(cmd),
        }
        Ok(CmdOutput::default())
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()> {
        match mode {
            Some(mode) => self.note(format_args!(
                "write {} ({} bytes, mode {mode:o})",
                path.display(),
                contents.len()
            )),
            None => self.note(format_args!("write {} ({} bytes)", path.display(), contents.len())),
        }
        Ok(())
    }

    fn append_file(&self, path: &Path, text: &str) -> Result<()> {
        self.note(format_args!("append {} ({} bytes)", path.display(), text.len()));
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        read_optional(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.note(format_args!("remove {}", path.display()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn make_dir(&self, path: &Path, owner: &str, mode: u32, parents: bool) -> Result<()> {
        let flag = if parents { " -p" } else { "" };
        self.note(format_args!(
            "mkdir{flag} {} (owner {owner}, mode {mode:o})",
            path.display()
        ));
        Ok(())
    }

    fn chown(&self, path: &Path, owner: &str) -> Result<()> {
        self.note(format_args!("chown {owner} {}", path.display()));
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        self.note(format_args!("chmod {mode:o} {}", path.display()));
        Ok(())
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.note(format_args!("download {url} -> {}", dest.display()));
        Ok(())
    }

    fn home_dir(&self, account: &str) -> Result<PathBuf> {
        Ok(Account::lookup(account)
            .map(|a| a.home)
            .unwrap_or_else(|_| Path::new("/home").join(account)))
    }

    fn hardware_id(&self) -> Result<Option<String>> {
        Ok(hwid::hardware_id(&self.sys_class_net).unwrap_or(None))
    }

    fn broadcast(&self, text: &str) -> Result<()> {
        tracing::info!("{text}");
        if !self.log_only {
            println!("{text}");
        }
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        self.note(format_args!("pause {}s", duration.as_secs_f32()));
    }
}


// ---------------------------------------------------------------------------
// RecordingHost (tests)
// ---------------------------------------------------------------------------
