use crate::error::{LosError, Result};
use crate::password::PasswordPolicy;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// KeyboardConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    #[serde(default = "default_layout_code")]
    pub layout_code: String,
    #[serde(default = "default_layout_name")]
    pub layout_name: String,
}

fn default_layout_code() -> String {
    "us".to_string()
}

fn default_layout_name() -> String {
    "English (US)".to_string()
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            layout_code: default_layout_code(),
            layout_name: default_layout_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// RepositoryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_repo_url")]
    pub url: String,
    /// Remote URL set after cloning, so pushes go over ssh.
    #[serde(default = "default_repo_push_url")]
    pub push_url: String,
    /// Clone destination; `<account home>/Little-Oven` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<PathBuf>,
}

fn default_repo_url() -> String {
    "https://github.com/Coding-Badly/Little-Oven.git".to_string()
}

fn default_repo_push_url() -> String {
    "git@github.com:Coding-Badly/Little-Oven.git".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: default_repo_url(),
            push_url: default_repo_push_url(),
            dest: None,
        }
    }
}

// ---------------------------------------------------------------------------
// VeraCryptConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeraCryptConfig {
    #[serde(default = "default_veracrypt_url")]
    pub url: String,
    /// Name of the console installer inside the tarball.
    #[serde(default = "default_veracrypt_setup_name")]
    pub setup_name: String,
}

fn default_veracrypt_url() -> String {
    "https://launchpad.net/veracrypt/trunk/1.21/+download/veracrypt-1.21-raspbian-setup.tar.bz2"
        .to_string()
}

fn default_veracrypt_setup_name() -> String {
    "veracrypt-1.21-setup-console-armv7".to_string()
}

impl Default for VeraCryptConfig {
    fn default() -> Self {
        Self {
            url: default_veracrypt_url(),
            setup_name: default_veracrypt_setup_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// Provisioning settings, read from `los.yaml` in the working root.
/// Every field has a default so the file is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The developer account that ends up owning the workspace.
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Name replaced in `/etc/hosts` when the hostname changes.
    #[serde(default = "default_previous_hostname")]
    pub previous_hostname: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// systemd unit that re-runs `los` at boot.
    #[serde(default = "default_service")]
    pub service: String,
    /// Where `los.json` is fetched from.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_reboot_delay")]
    pub reboot_delay_secs: u64,
    /// Pause before `apt-get update` so the network can settle after boot.
    #[serde(default = "default_settle")]
    pub settle_secs: u64,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_rustup_url")]
    pub rustup_url: String,
    #[serde(default)]
    pub veracrypt: VeraCryptConfig,
    #[serde(default)]
    pub password: PasswordPolicy,
}

fn default_account() -> String {
    "pi".to_string()
}

fn default_hostname() -> String {
    "Little-Oven".to_string()
}

fn default_previous_hostname() -> String {
    "raspberrypi".to_string()
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

fn default_locale() -> String {
    "en_US.UTF-8".to_string()
}

fn default_service() -> String {
    "los.service".to_string()
}

fn default_base_url() -> String {
    "https://raw.githubusercontent.com/Coding-Badly/Little-Oven/master/pi".to_string()
}

fn default_reboot_delay() -> u64 {
    5
}

fn default_settle() -> u64 {
    5
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("/var/cache/Rowdy Dog Software/Little-Oven/pans")
}

fn default_rustup_url() -> String {
    "https://sh.rustup.rs".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: default_account(),
            hostname: default_hostname(),
            previous_hostname: default_previous_hostname(),
            timezone: default_timezone(),
            keyboard: KeyboardConfig::default(),
            locale: default_locale(),
            service: default_service(),
            base_url: default_base_url(),
            reboot_delay_secs: default_reboot_delay(),
            settle_secs: default_settle(),
            repository: RepositoryConfig::default(),
            cache_dir: default_cache_dir(),
            rustup_url: default_rustup_url(),
            veracrypt: VeraCryptConfig::default(),
            password: PasswordPolicy::default(),
        }
    }
}

/// Tools the steps shell out to.
pub const REQUIRED_TOOLS: &[&str] = &[
    "apt-get",
    "chpasswd",
    "debconf-set-selections",
    "dpkg-reconfigure",
    "update-locale",
    "sed",
    "tar",
    "cp",
    "rm",
    "chown",
    "systemctl",
    "reboot",
];

impl Config {
    /// Load `los.yaml` from `root`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// `<base_url>/los.json`
    pub fn global_config_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            paths::GLOBAL_CONFIG_FILE
        )
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            })
        };

        if self.account.trim().is_empty() {
            error("account must not be empty".to_string());
        }
        if !paths::is_valid_hostname(&self.hostname) {
            error(format!(
                "hostname '{}' is not a valid host name (letters, digits, inner hyphens, at most 63)",
                self.hostname
            ));
        }
        if !self.timezone.contains('/') {
            error(format!(
                "timezone '{}' should look like Area/Location",
                self.timezone
            ));
        }
        if !self.service.ends_with(".service") {
            error(format!("service '{}' must be a .service unit", self.service));
        }
        for (key, url) in [
            ("base_url", &self.base_url),
            ("rustup_url", &self.rustup_url),
            ("veracrypt.url", &self.veracrypt.url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                error(format!("{key} '{url}' is not an http(s) URL"));
            }
        }
        if let PasswordPolicy::Generate {
            words,
            min_length,
            max_length,
            ..
        } = &self.password
        {
            if *words == 0 {
                error("password.words must be at least 1".to_string());
            }
            if min_length > max_length {
                error(format!(
                    "password.min_length ({min_length}) exceeds password.max_length ({max_length})"
                ));
            }
        }
        if let PasswordPolicy::Fixed { value } = &self.password {
            if value.contains(':') || value.contains('\n') {
                error("password.value must not contain ':' or newlines".to_string());
            }
        }

        if let PasswordPolicy::Generate { wordlist, .. } = &self.password {
            if !wordlist.exists() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("word list {} does not exist", wordlist.display()),
                });
            }
        }
        if self.reboot_delay_secs > 60 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "reboot_delay_secs={} (>60 is unusual)",
                    self.reboot_delay_secs
                ),
            });
        }
        for tool in REQUIRED_TOOLS {
            if which::which(tool).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("'{tool}' not found on PATH"),
                });
            }
        }

        warnings
    }

    /// Fail with every error-level finding; warnings are logged and ignored.
    pub fn ensure_valid(&self) -> Result<()> {
        let mut errors = Vec::new();
        for w in self.validate() {
            match w.level {
                WarnLevel::Warning => tracing::warn!("{}", w.message),
                WarnLevel::Error => errors.push(w.message),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LosError::InvalidConfig(errors.join("; ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
