//! Ownership and permission helpers for the non-privileged account.
//!
//! The provisioning process runs as root, but everything it creates under
//! the developer's home (and a few shared directories) must end up owned by
//! the developer account.

use nix::unistd::{Gid, Uid, User};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::error::{LosError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: Uid,
    pub gid: Gid,
    pub home: PathBuf,
}

impl Account {
    pub fn lookup(name: &str) -> Result<Self> {
        let user = User::from_name(name)?.ok_or_else(|| LosError::UnknownAccount(name.into()))?;
        Ok(Self::from_user(user))
    }

    /// The account this process runs as.
    pub fn current() -> Result<Self> {
        let uid = nix::unistd::getuid();
        let user = User::from_uid(uid)?.ok_or_else(|| LosError::UnknownAccount(uid.to_string()))?;
        Ok(Self::from_user(user))
    }

    fn from_user(user: User) -> Self {
        Self {
            name: user.name,
            uid: user.uid,
            gid: user.gid,
            home: user.dir,
        }
    }

    pub fn chown(&self, path: &Path) -> Result<()> {
        nix::unistd::chown(path, Some(self.uid), Some(self.gid))?;
        Ok(())
    }

    /// Create `path` (and its parents when `parents` is set), then apply
    /// ownership and `mode`. An existing directory is not an error; ownership
    /// and mode are reapplied on every call.
    pub fn make_dir(&self, path: &Path, mode: u32, parents: bool) -> Result<()> {
        let created = if parents {
            std::fs::create_dir_all(path)
        } else {
            std::fs::create_dir(path)
        };
        match created {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => {}
            Err(e) => return Err(e.into()),
        }
        self.chown(path)?;
        set_mode(path, mode)
    }
}

pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}
