//! netventory-exec: SSH session abstraction
//!
//! Provides the command execution trait used by device probers and an SSH
//! implementation with password or private-key authentication.

pub mod credentials;
pub mod error;
pub mod result;
pub mod ssh;
pub mod traits;

pub use credentials::{Credential, CredentialError, CredentialSource};
pub use error::ExecError;
pub use result::{CommandResult, ConnectionInfo};
pub use ssh::SshExecutor;
pub use traits::RemoteExecutor;
