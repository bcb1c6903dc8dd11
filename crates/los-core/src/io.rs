use crate::error::Result;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// A crash mid-write leaves either the old content or the new, never a mix.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = temp_beside(path)?;
    finish_write(tmp, path, data)
}

/// [`atomic_write`], with `mode` applied to the tempfile before any data is
/// written. The contents are never visible under looser permissions.
pub fn atomic_write_mode(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    let tmp = temp_beside(path)?;
    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(mode))?;
    finish_write(tmp, path, data)
}

fn finish_write(mut tmp: NamedTempFile, path: &Path, data: &[u8]) -> Result<()> {
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a tempfile in the directory that will hold `path`, creating the
/// directory first if needed. Persisting it onto `path` is a rename.
pub fn temp_beside(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    Ok(NamedTempFile::new_in(dir)?)
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Remove a file. Returns false when there was nothing to remove.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
