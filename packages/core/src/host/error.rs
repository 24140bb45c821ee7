//! Host-specific error types
//!
//! Errors that can occur while provisioning or cleaning up a remote Docker host.

use thiserror::Error;

/// Errors that can occur during host operations
#[derive(Error, Debug)]
pub enum HostError {
    /// Descriptor has a `scheme://` prefix other than `tcp` or `ssh`
    #[error("Scheme not supported: {0}")]
    UnsupportedScheme(String),

    /// Descriptor could not be split into host parts
    #[error("Invalid host descriptor \"{0}\": {1}")]
    InvalidDescriptor(String, String),

    /// Descriptor parsed to an empty hostname
    #[error("Host name is empty for host \"{0}\"")]
    EmptyHostname(String),

    /// Creating, writing or removing a provisioned file failed
    #[error("{0}")]
    Io(String),

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    /// Failed to read the user's SSH config
    #[error("Failed to read SSH config: {0}")]
    SshConfigRead(String),

    /// Failed to write the user's SSH config
    #[error("Failed to write SSH config: {0}")]
    SshConfigWrite(String),

    /// Failed to build or apply the marker-block removal pattern
    #[error("Failed to patch SSH config: {0}")]
    ConfigPatch(String),
}

impl HostError {
    /// Whether this error came from parsing the host descriptor
    ///
    /// Parse errors are raised before anything touches the filesystem.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            HostError::UnsupportedScheme(_)
                | HostError::InvalidDescriptor(..)
                | HostError::EmptyHostname(_)
        )
    }
}
