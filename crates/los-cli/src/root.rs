use std::path::{Path, PathBuf};

use los_core::paths;

/// Resolve the working root.
///
/// Priority:
/// 1. `--root` flag / `LOS_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `los.yaml`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd).unwrap_or(cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(paths::CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(dir.path())), dir.path());
    }

    #[test]
    fn finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("los.yaml"), "hostname: Test-Oven\n").unwrap();
        let deep = dir.path().join("a/b");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(find_upward(&deep).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_config_anywhere() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a");
        std::fs::create_dir_all(&deep).unwrap();
        // Ancestors above the tempdir may hold a los.yaml on a developer
        // machine; only assert we never pick something below the start.
        if let Some(found) = find_upward(&deep) {
            assert!(!found.starts_with(&deep));
        }
    }
}
