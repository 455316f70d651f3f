//! Test configuration loading
//!
//! The configuration file is YAML and names the Rancher server to talk to
//! plus optional overrides for the snapshot wait windows:
//!
//! ```yaml
//! rancher:
//!   host: rancher.example.com
//!   adminToken: token-abc:secret
//!   insecure: true
//! waits:
//!   create:
//!     intervalMs: 5000
//!     timeoutMs: 300000
//! ```
//!
//! When no explicit path is given the file named by `CATTLE_TEST_CONFIG` is
//! used. `RANCHER_HOST`, `RANCHER_ADMIN_TOKEN` and `RANCHER_INSECURE` override
//! the corresponding file values.

use crate::defaults::{
    FIFTEEN_MINUTE_TIMEOUT, FIVE_MINUTE_TIMEOUT, FIVE_SECOND_INTERVAL, HALF_SECOND_INTERVAL,
    ONE_MINUTE_TIMEOUT, ONE_SECOND_INTERVAL, THIRTY_MINUTE_TIMEOUT,
};
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "CATTLE_TEST_CONFIG";

const HOST_ENV_VAR: &str = "RANCHER_HOST";
const TOKEN_ENV_VAR: &str = "RANCHER_ADMIN_TOKEN";
const INSECURE_ENV_VAR: &str = "RANCHER_INSECURE";

/// Top-level test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    /// Rancher server connection settings
    #[serde(default)]
    pub rancher: RancherConfig,

    /// Poll windows used while waiting on snapshot operations
    #[serde(default)]
    pub waits: SnapshotWaits,
}

impl TestConfig {
    /// Load configuration from the given path, or from `CATTLE_TEST_CONFIG`
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_owned(),
            None => std::env::var(CONFIG_ENV_VAR)
                .map(Utf8PathBuf::from)
                .map_err(|_| Error::config_path_unset(CONFIG_ENV_VAR))?,
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(config_path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.rancher.apply_env_overrides();
        config.rancher.validate()?;
        config.waits.validate()?;

        tracing::debug!("Loaded test configuration from {}", config_path);
        Ok(config)
    }

    /// Parse configuration from a YAML string without env overrides
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }
}

/// Rancher server connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RancherConfig {
    /// Server host, with or without scheme
    #[serde(default)]
    pub host: String,

    /// API token sent as a bearer token
    #[serde(default)]
    pub admin_token: String,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,
}

impl RancherConfig {
    pub fn new(host: impl Into<String>, admin_token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            admin_token: admin_token.into(),
            insecure: false,
        }
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Base URL of the server, defaulting to https when no scheme is given
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// Reject configurations that cannot reach a server
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::invalid_config("rancher.host must not be empty"));
        }
        if self.admin_token.trim().is_empty() {
            return Err(Error::invalid_config(
                "rancher.adminToken must not be empty",
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(HOST_ENV_VAR) {
            self.host = host;
        }
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            self.admin_token = token;
        }
        if let Ok(insecure) = std::env::var(INSECURE_ENV_VAR) {
            self.insecure = matches!(insecure.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }
}

/// Interval and timeout for one waiting phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSettings {
    /// Delay between checks in milliseconds
    pub interval_ms: u64,

    /// Overall deadline in milliseconds
    pub timeout_ms: u64,
}

impl PollSettings {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Poll windows for each snapshot wait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotWaits {
    /// Waiting for a new snapshot to become active (both flavors)
    #[serde(default = "default_create")]
    pub create: PollSettings,

    /// RKE1 restore: waiting for the cluster to leave the active state
    #[serde(default = "default_rke1_restore_start")]
    pub rke1_restore_start: PollSettings,

    /// RKE1 restore: waiting for the cluster to become active again.
    /// RKE1 nodes are slow to come back, hence the long window.
    #[serde(default = "default_rke1_restore_complete")]
    pub rke1_restore_complete: PollSettings,

    /// RKE2/K3s restore: waiting for the cluster to leave the active state
    #[serde(default = "default_rke2_restore_start")]
    pub rke2_restore_start: PollSettings,

    /// RKE2/K3s restore: waiting for the cluster to become active again
    #[serde(default = "default_rke2_restore_complete")]
    pub rke2_restore_complete: PollSettings,
}

fn default_create() -> PollSettings {
    PollSettings::new(FIVE_SECOND_INTERVAL, FIVE_MINUTE_TIMEOUT)
}

fn default_rke1_restore_start() -> PollSettings {
    PollSettings::new(ONE_SECOND_INTERVAL, ONE_MINUTE_TIMEOUT)
}

fn default_rke1_restore_complete() -> PollSettings {
    PollSettings::new(FIVE_SECOND_INTERVAL, THIRTY_MINUTE_TIMEOUT)
}

fn default_rke2_restore_start() -> PollSettings {
    PollSettings::new(HALF_SECOND_INTERVAL, ONE_MINUTE_TIMEOUT)
}

fn default_rke2_restore_complete() -> PollSettings {
    PollSettings::new(HALF_SECOND_INTERVAL, FIFTEEN_MINUTE_TIMEOUT)
}

impl Default for SnapshotWaits {
    fn default() -> Self {
        Self {
            create: default_create(),
            rke1_restore_start: default_rke1_restore_start(),
            rke1_restore_complete: default_rke1_restore_complete(),
            rke2_restore_start: default_rke2_restore_start(),
            rke2_restore_complete: default_rke2_restore_complete(),
        }
    }
}

impl SnapshotWaits {
    /// Use the same window for every phase
    pub fn uniform(settings: PollSettings) -> Self {
        Self {
            create: settings,
            rke1_restore_start: settings,
            rke1_restore_complete: settings,
            rke2_restore_start: settings,
            rke2_restore_complete: settings,
        }
    }

    /// Reject windows that would poll without pausing
    pub fn validate(&self) -> Result<()> {
        let phases = [
            ("create", &self.create),
            ("rke1RestoreStart", &self.rke1_restore_start),
            ("rke1RestoreComplete", &self.rke1_restore_complete),
            ("rke2RestoreStart", &self.rke2_restore_start),
            ("rke2RestoreComplete", &self.rke2_restore_complete),
        ];

        for (name, settings) in phases {
            if settings.interval_ms == 0 {
                return Err(Error::invalid_config(format!(
                    "waits.{}.intervalMs must be greater than 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const MINIMAL: &str = r#"
rancher:
  host: rancher.example.com
  adminToken: token-abc:secret
"#;

    fn clear_env() {
        for var in [CONFIG_ENV_VAR, HOST_ENV_VAR, TOKEN_ENV_VAR, INSECURE_ENV_VAR] {
            std::env::remove_var(var);
        }
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_uses_default_waits() {
        let config = TestConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.rancher.host, "rancher.example.com");
        assert_eq!(config.rancher.admin_token, "token-abc:secret");
        assert!(!config.rancher.insecure);
        assert_eq!(config.waits, SnapshotWaits::default());
        assert_eq!(config.waits.create.interval(), FIVE_SECOND_INTERVAL);
        assert_eq!(config.waits.create.timeout(), FIVE_MINUTE_TIMEOUT);
        assert_eq!(
            config.waits.rke1_restore_complete.timeout(),
            THIRTY_MINUTE_TIMEOUT
        );
        assert_eq!(
            config.waits.rke2_restore_start.interval(),
            HALF_SECOND_INTERVAL
        );
    }

    #[test]
    fn test_partial_wait_override() {
        let yaml = r#"
rancher:
  host: rancher.example.com
  adminToken: t
waits:
  rke2RestoreComplete:
    intervalMs: 10
    timeoutMs: 100
"#;
        let config = TestConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.waits.rke2_restore_complete.interval_ms, 10);
        assert_eq!(config.waits.rke2_restore_complete.timeout_ms, 100);
        assert_eq!(config.waits.create, default_create());
    }

    #[test]
    fn test_base_url() {
        let config = RancherConfig::new("rancher.example.com/", "t");
        assert_eq!(config.base_url(), "https://rancher.example.com");

        let config = RancherConfig::new("http://127.0.0.1:8080", "t");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let config = RancherConfig::new("rancher.example.com", " ");
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_load_from_env_path() {
        clear_env();
        let file = write_config(MINIMAL);
        std::env::set_var(CONFIG_ENV_VAR, file.path());

        let config = TestConfig::load(None).unwrap();
        assert_eq!(config.rancher.host, "rancher.example.com");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_without_path_fails() {
        clear_env();
        let err = TestConfig::load(None).unwrap_err();
        assert!(matches!(err, Error::ConfigPathUnset { .. }));
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        clear_env();
        let err = TestConfig::load(Some(Utf8Path::new("/nonexistent/cattle.yaml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let yaml = r#"
rancher:
  host: rancher.example.com
  adminToken: t
waits:
  rke1RestoreStart:
    intervalMs: 0
    timeoutMs: 1000
"#;
        let config = TestConfig::from_yaml(yaml).unwrap();
        let err = config.waits.validate().unwrap_err();
        assert!(err.to_string().contains("rke1RestoreStart"));
        assert!(SnapshotWaits::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_rejects_zero_interval() {
        clear_env();
        let file = write_config(
            r#"
rancher:
  host: rancher.example.com
  adminToken: t
waits:
  create:
    intervalMs: 0
    timeoutMs: 1000
"#,
        );

        let path = Utf8Path::from_path(file.path()).unwrap();
        let err = TestConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    #[serial]
    fn test_connection_from_env_only() {
        clear_env();
        let file = write_config(
            r#"
rancher: {}
waits:
  create:
    intervalMs: 1000
    timeoutMs: 60000
"#,
        );
        std::env::set_var(HOST_ENV_VAR, "rancher.example.com");
        std::env::set_var(TOKEN_ENV_VAR, "token-env:secret");

        let path = Utf8Path::from_path(file.path()).unwrap();
        let config = TestConfig::load(Some(path)).unwrap();
        assert_eq!(config.rancher.host, "rancher.example.com");
        assert_eq!(config.rancher.admin_token, "token-env:secret");
        assert_eq!(config.waits.create.timeout_ms, 60_000);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_host_rejected_after_overrides() {
        clear_env();
        let file = write_config("rancher:\n  adminToken: t\n");

        let path = Utf8Path::from_path(file.path()).unwrap();
        let err = TestConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { ref message } if message.contains("host")));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        let file = write_config(MINIMAL);
        std::env::set_var(HOST_ENV_VAR, "https://other.example.com");
        std::env::set_var(INSECURE_ENV_VAR, "TRUE");

        let path = Utf8Path::from_path(file.path()).unwrap();
        let config = TestConfig::load(Some(path)).unwrap();
        assert_eq!(config.rancher.host, "https://other.example.com");
        assert_eq!(config.rancher.admin_token, "token-abc:secret");
        assert!(config.rancher.insecure);
        clear_env();
    }
}
