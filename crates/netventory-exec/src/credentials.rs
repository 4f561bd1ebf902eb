//! Device login credentials and their resolution
//!
//! Credentials are resolved once at startup and shared by every probe, so a
//! bulk run never re-reads key files or environment variables per device.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use russh::keys::{PrivateKey, decode_secret_key, load_secret_key};
use tracing::debug;

/// Where the login secret comes from
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Password read from the named environment variable
    PasswordEnv(String),
    /// Private key file on disk (must be mode 600)
    KeyFile(PathBuf),
    /// Base64-encoded OpenSSH private key in the named environment variable
    KeyEnv(String),
}

impl CredentialSource {
    /// Resolve the source into usable login material
    ///
    /// # Errors
    /// Returns `CredentialError` if the variable is unset, the key cannot be
    /// decoded or the key file is readable by others.
    pub fn resolve(&self) -> Result<Credential, CredentialError> {
        match self {
            CredentialSource::PasswordEnv(var_name) => {
                let password =
                    env::var(var_name).map_err(|_| CredentialError::EnvNotSet(var_name.clone()))?;
                if password.is_empty() {
                    return Err(CredentialError::EmptyPassword(var_name.clone()));
                }
                Ok(Credential::Password(password))
            }
            CredentialSource::KeyFile(path) => {
                validate_key_permissions(path)?;
                let key = load_secret_key(path, None)
                    .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;
                debug!(path = %path.display(), "loaded private key");
                Ok(Credential::Key(Arc::new(key)))
            }
            CredentialSource::KeyEnv(var_name) => {
                let encoded =
                    env::var(var_name).map_err(|_| CredentialError::EnvNotSet(var_name.clone()))?;
                let pem = base64_decode(&encoded).map_err(|_| CredentialError::InvalidBase64)?;
                let pem = String::from_utf8(pem).map_err(|_| CredentialError::InvalidBase64)?;
                let key = decode_secret_key(&pem, None)
                    .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;
                Ok(Credential::Key(Arc::new(key)))
            }
        }
    }
}

/// Resolved login material
#[derive(Clone)]
pub enum Credential {
    /// Keyboard password
    Password(String),
    /// Decoded private key
    Key(Arc<PrivateKey>),
}

impl Credential {
    /// Short name for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Password(_) => "password",
            Credential::Key(_) => "publickey",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password(_) => f.write_str("Credential::Password(<redacted>)"),
            Credential::Key(_) => f.write_str("Credential::Key(<redacted>)"),
        }
    }
}

/// Credential resolution errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("environment variable {0} not set")]
    EnvNotSet(String),

    #[error("environment variable {0} holds an empty password")]
    EmptyPassword(String),

    #[error("invalid base64 encoding")]
    InvalidBase64,

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("key file permissions too open: {0} (should be 600)")]
    BadPermissions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn base64_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(input.trim())
}

fn validate_key_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode();

    // group and other bits must be clear
    if mode & 0o77 != 0 {
        return Err(CredentialError::BadPermissions(path.display().to_string()));
    }

    Ok(())
}
