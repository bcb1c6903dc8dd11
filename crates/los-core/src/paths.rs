use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Working-root files
// ---------------------------------------------------------------------------

pub const STEP_FILE: &str = "los.step";
pub const CONFIG_FILE: &str = "los.yaml";
pub const GLOBAL_CONFIG_FILE: &str = "los.json";
pub const PASSWORD_FILE: &str = "los.password";

// ---------------------------------------------------------------------------
// System locations
// ---------------------------------------------------------------------------

pub const ETC_HOSTNAME: &str = "/etc/hostname";
pub const ETC_HOSTS: &str = "/etc/hosts";
pub const ETC_TIMEZONE: &str = "/etc/timezone";
pub const ETC_LOCALTIME: &str = "/etc/localtime";
pub const ETC_LOCALE_GEN: &str = "/etc/locale.gen";
pub const PROFILE_CHECK_SCRIPT: &str = "/etc/profile.d/check_for_rust_and_veracrypt.sh";
pub const RUSTUP_SCRIPT: &str = "/usr/local/bin/rustup.sh";
pub const VERACRYPT_SETUP: &str = "/usr/local/bin/veracrypt-setup";
pub const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";
pub const SYS_CLASS_NET: &str = "/sys/class/net";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn step_path(root: &Path) -> PathBuf {
    root.join(STEP_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn global_config_path(root: &Path) -> PathBuf {
    root.join(GLOBAL_CONFIG_FILE)
}

pub fn password_path(root: &Path) -> PathBuf {
    root.join(PASSWORD_FILE)
}

pub fn unit_path(service: &str) -> PathBuf {
    Path::new(SYSTEMD_UNIT_DIR).join(service)
}

// ---------------------------------------------------------------------------
// Hostname validation
// ---------------------------------------------------------------------------

static HOSTNAME_RE: OnceLock<Regex> = OnceLock::new();

fn hostname_re() -> &'static Regex {
    HOSTNAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?$").expect("static regex")
    })
}

/// A single RFC 1123 label: letters, digits and inner hyphens, at most 63 chars.
pub fn is_valid_hostname(name: &str) -> bool {
    !name.is_empty() && name.len() <= 63 && hostname_re().is_match(name)
}
