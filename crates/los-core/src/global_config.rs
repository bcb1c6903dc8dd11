//! Per-device settings shared across all ovens.
//!
//! `los.json` maps a hardware id (see [`crate::hwid`]) to that device's
//! settings:
//!
//! ```json
//! { "B827EB123456": { "github": { "user.name": "...", "user.email": "..." } } }
//! ```
//!
//! The file is optional. It is fetched once during provisioning and held in
//! memory for the rest of the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fetch::{self, FetchOutcome};
use crate::host::Host;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitIdentity {
    #[serde(rename = "user.name", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "user.email", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(rename = "core.editor", default, skip_serializing_if = "Option::is_none")]
    pub core_editor: Option<String>,
}

impl GitIdentity {
    pub fn name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Git User Name Goes Here")
    }

    pub fn email(&self) -> &str {
        self.user_email
            .as_deref()
            .unwrap_or("whomever@dallasmakerspace.org")
    }

    pub fn editor(&self) -> &str {
        self.core_editor.as_deref().unwrap_or("nano")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitIdentity>,
}

#[derive(Debug, Clone)]
pub struct GlobalConfig {
    path: PathBuf,
    devices: HashMap<String, DeviceConfig>,
}

impl GlobalConfig {
    /// Load the cached copy at `path`; a missing file is an empty config.
    pub fn load(host: &dyn Host, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let devices = match host.read_file(&path)? {
            Some(text) => serde_json::from_str(&text)?,
            None => HashMap::new(),
        };
        Ok(Self { path, devices })
    }

    /// Download `url` over the cached copy and reload it. A non-success HTTP
    /// status means no global configuration is published; the previous
    /// contents (usually none) stay in effect.
    pub fn fetch(&mut self, host: &dyn Host, url: &str) -> Result<FetchOutcome> {
        let outcome = fetch::optional(host.download(url, &self.path))?;
        match outcome {
            FetchOutcome::Fetched => {
                *self = Self::load(host, self.path.clone())?;
            }
            FetchOutcome::NotAvailable { status } => {
                tracing::info!(url, status, "no global configuration available");
            }
        }
        Ok(outcome)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn device(&self, hardware_id: &str) -> Option<&DeviceConfig> {
        self.devices.get(hardware_id)
    }

    pub fn github(&self, hardware_id: &str) -> Option<&GitIdentity> {
        self.device(hardware_id).and_then(|d| d.github.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;

    const URL: &str = "https://example.test/pi/los.json";

    #[test]
    fn missing_file_is_empty() {
        let host = RecordingHost::new();
        let cfg = GlobalConfig::load(&host, "/work/los.json").unwrap();
        assert!(cfg.is_empty());
        assert!(cfg.github("B827EB123456").is_none());
    }

    #[test]
    fn lookup_by_hardware_id() {
        let host = RecordingHost::new();
        host.seed_file(
            "/work/los.json",
            r#"{"B827EB123456": {"github": {"user.name": "Brian", "user.email": "b@example.com"}},
                "DCA632010203": {}}"#,
        );
        let cfg = GlobalConfig::load(&host, "/work/los.json").unwrap();
        let git = cfg.github("B827EB123456").unwrap();
        assert_eq!(git.name(), "Brian");
        assert_eq!(git.email(), "b@example.com");
        assert_eq!(git.editor(), "nano");
        assert!(cfg.device("DCA632010203").is_some());
        assert!(cfg.github("DCA632010203").is_none());
    }

    #[test]
    fn malformed_json_is_fatal() {
        let host = RecordingHost::new();
        host.seed_file("/work/los.json", "{not json");
        assert!(GlobalConfig::load(&host, "/work/los.json").is_err());
    }

    #[test]
    fn fetch_reloads_on_success() {
        let host = RecordingHost::new();
        host.bodies
            .borrow_mut()
            .insert(URL.into(), r#"{"ABC": {"github": {}}}"#.into());
        let mut cfg = GlobalConfig::load(&host, "/work/los.json").unwrap();
        assert_eq!(cfg.fetch(&host, URL).unwrap(), FetchOutcome::Fetched);
        assert!(cfg.github("ABC").is_some());
    }

    #[test]
    fn fetch_not_found_keeps_running() {
        let host = RecordingHost::new();
        host.http_status.borrow_mut().insert(URL.into(), 404);
        let mut cfg = GlobalConfig::load(&host, "/work/los.json").unwrap();
        assert_eq!(
            cfg.fetch(&host, URL).unwrap(),
            FetchOutcome::NotAvailable { status: 404 }
        );
        assert!(cfg.is_empty());
    }
}
