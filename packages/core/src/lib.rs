//! docker-remote-core - Core library for docker-remote
//!
//! Points a local Docker client at a remote engine for the duration of a
//! script: SSH hosts get a generated client alias, TCP hosts get their TLS
//! material written to disk, and everything is removed afterwards.

pub mod config;
pub mod host;
pub mod run;
pub mod version;

// Re-export commonly used types
pub use config::{RunConfig, load_env_file};
pub use host::{DockerHost, EnvMap, HostError, HostSpec, Provisioner, Scheme};
pub use run::{RunError, ScriptRunner, ShellScript, run};
pub use version::{get_version, get_version_long};
