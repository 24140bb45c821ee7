//! Host management module
//!
//! Provides functionality for reaching remote Docker hosts:
//! - Host descriptor parsing
//! - SSH alias provisioning through the user's SSH config
//! - TLS certificate provisioning for TCP hosts
//! - The shared provision/cleanup contract

mod error;
pub(crate) mod fs;
mod provision;
mod spec;
mod ssh;
mod ssh_config;
mod tcp;

// Public exports
pub use error::HostError;
pub use provision::{
    DOCKER_CERT_PATH, DOCKER_HOST, DOCKER_TLS_VERIFY, DockerHost, EnvMap, Provisioner,
};
pub use spec::{HostSpec, Scheme};
pub use ssh::{FRAGMENT_FILE_NAME, KEY_FILE_NAME, SshHost, SshHostState, WORK_DIR_NAME};
pub use ssh_config::{
    HostSection, MarkerBlock, ResolvedHost, SECTION_PREFIX, SshConfigFile, next_section_id,
    resolve_alias,
};
pub use tcp::{CERT_DIR_NAME, TcpHost};
