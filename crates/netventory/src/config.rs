//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{WrapErr, bail};
use netventory_core::{ClassifierConfig, IngestConfig};
use netventory_exec::CredentialSource;
use netventory_probe::Vendor;
use serde::{Deserialize, Serialize};

/// Environment variable pointing at the config file
pub const CONFIG_ENV: &str = "NETVENTORY_CONFIG";

/// Password variable used when `[probe]` names no credential source
pub const DEFAULT_PASSWORD_ENV: &str = "J_PASSWD";

/// Top-level configuration for the netventory daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Daemon server settings
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Inventory storage
    #[serde(default)]
    pub store: StoreConfig,
    /// Device login and timeouts
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Bulk ingestion limits
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Hostname classification rules
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Daemon server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address and port to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory holding device list files served by `/api/populatedb`
    #[serde(default = "default_devices_dir")]
    pub devices_dir: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            devices_dir: default_devices_dir(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_devices_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Inventory storage; no path means an in-memory inventory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON inventory file
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Device login settings
///
/// Secrets never live in the file: `password_env` and `key_env` name
/// environment variables, `key_path` names a key file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Vendor strategy
    #[serde(default)]
    pub vendor: Vendor,
    /// Login user; defaults to `$USER`
    #[serde(default = "default_user")]
    pub user: String,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Per-command timeout in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    /// Environment variable holding the login password
    #[serde(default)]
    pub password_env: Option<String>,
    /// Private key file
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    /// Environment variable holding a base64-encoded private key
    #[serde(default)]
    pub key_env: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            vendor: Vendor::default(),
            user: default_user(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout(),
            command_timeout_secs: default_command_timeout(),
            password_env: None,
            key_path: None,
            key_env: None,
        }
    }
}

fn default_user() -> String {
    std::env::var("USER").unwrap_or_default()
}

fn default_port() -> u16 {
    22
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_command_timeout() -> u64 {
    30
}

impl ProbeConfig {
    /// Connect timeout as a `Duration`
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Command timeout as a `Duration`
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// The configured credential source
    ///
    /// # Errors
    /// Returns error if more than one source is set.
    pub fn credential_source(&self) -> eyre::Result<CredentialSource> {
        match (&self.password_env, &self.key_path, &self.key_env) {
            (None, None, None) => Ok(CredentialSource::PasswordEnv(
                DEFAULT_PASSWORD_ENV.to_string(),
            )),
            (Some(var), None, None) => Ok(CredentialSource::PasswordEnv(var.clone())),
            (None, Some(path), None) => Ok(CredentialSource::KeyFile(path.clone())),
            (None, None, Some(var)) => Ok(CredentialSource::KeyEnv(var.clone())),
            _ => bail!("[probe] accepts only one of password_env, key_path and key_env"),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or fails validation
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns error if a config file is found but cannot be loaded
    pub fn load_default() -> eyre::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        let mut paths = vec![
            PathBuf::from("netventory.toml"),
            PathBuf::from("/etc/netventory/netventory.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("netventory/netventory.toml"));
        }

        for path in paths {
            if path.exists() {
                tracing::info!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }

        tracing::warn!("no config file found, using defaults");
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    ///
    /// # Errors
    /// Returns error describing the first invalid setting
    pub fn validate(&self) -> eyre::Result<()> {
        if self.probe.user.trim().is_empty() {
            bail!("[probe] user is empty and $USER is not set");
        }
        if self.ingest.concurrency == 0 {
            bail!("[ingest] concurrency must be at least 1");
        }
        if self.ingest.deadline_secs == Some(0) {
            bail!("[ingest] deadline_secs must be positive");
        }
        self.probe.credential_source()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[daemon]
bind = "0.0.0.0:9000"
log_level = "debug"
devices_dir = "/srv/netventory/lists"

[store]
path = "/var/lib/netventory/inventory.json"

[probe]
vendor = "juniper"
user = "netops"
port = 830
connect_timeout_secs = 3
key_env = "NETVENTORY_KEY"

[ingest]
concurrency = 64
deadline_secs = 600

[[classifier.rules]]
pattern = "^core-"
label = "Core"
"#;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(FULL).unwrap();
        config.validate().unwrap();

        assert_eq!(config.daemon.bind, "0.0.0.0:9000");
        assert_eq!(config.daemon.devices_dir, PathBuf::from("/srv/netventory/lists"));
        assert!(config.store.path.is_some());
        assert_eq!(config.probe.port, 830);
        assert_eq!(config.probe.command_timeout_secs, 30);
        assert!(matches!(
            config.probe.credential_source().unwrap(),
            CredentialSource::KeyEnv(var) if var == "NETVENTORY_KEY"
        ));
        assert_eq!(config.ingest.concurrency, 64);
        assert_eq!(config.classifier.rules.len(), 1);
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("[probe]\nuser = \"netops\"\n").unwrap();

        assert_eq!(config.daemon.bind, "127.0.0.1:8080");
        assert!(config.store.path.is_none());
        assert_eq!(config.probe.vendor, Vendor::Juniper);
        assert!(matches!(
            config.probe.credential_source().unwrap(),
            CredentialSource::PasswordEnv(var) if var == DEFAULT_PASSWORD_ENV
        ));
        assert!(config.classifier.rules.is_empty());
    }

    #[test]
    fn test_two_credential_sources_rejected() {
        let config: Config = toml::from_str(
            "[probe]\nuser = \"netops\"\npassword_env = \"PW\"\nkey_env = \"KEY\"\n",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config: Config =
            toml::from_str("[probe]\nuser = \"netops\"\n[ingest]\nconcurrency = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("netventory.toml");
        std::fs::write(&path, FULL).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.probe.user, "netops");
    }
}
