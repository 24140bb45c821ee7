//! Docker host provisioning contract
//!
//! Both transports share one lifecycle: `provision` lays down whatever
//! local state the Docker client needs and returns the environment that
//! points it at the remote engine, `cleanup` reverses every side effect.

use std::collections::BTreeMap;
use std::path::Path;

use super::error::HostError;
use super::spec::Scheme;
use super::ssh::SshHost;
use super::tcp::TcpHost;
use crate::config::RunConfig;

/// Environment variables produced by provisioning
pub type EnvMap = BTreeMap<String, String>;

pub const DOCKER_HOST: &str = "DOCKER_HOST";
pub const DOCKER_TLS_VERIFY: &str = "DOCKER_TLS_VERIFY";
pub const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

/// Lifecycle shared by every Docker host transport
pub trait Provisioner {
    /// Create provisioned state under `context_dir` and return the Docker env
    fn provision(&mut self, context_dir: &Path) -> Result<EnvMap, HostError>;

    /// Reverse everything `provision` created
    ///
    /// Must be a no-op when nothing was provisioned or when called twice.
    fn cleanup(&mut self) -> Result<(), HostError>;
}

/// The Docker host variant selected for a run
pub enum DockerHost {
    Ssh(SshHost),
    Tcp(TcpHost),
}

impl DockerHost {
    /// Build the variant for `scheme` from the run configuration
    pub fn from_config(scheme: Scheme, config: &RunConfig) -> Self {
        match scheme {
            Scheme::Ssh => {
                let mut host = SshHost::new(&config.host);
                if let Some(key) = non_empty(&config.ssh_key) {
                    host = host.with_key(key);
                }
                if let Some(user) = non_empty(&config.ssh_user) {
                    host = host.with_default_user(user);
                }
                if let Some(path) = &config.ssh_config_path {
                    host = host.with_ssh_config_path(path);
                }
                DockerHost::Ssh(host)
            }
            Scheme::Tcp => {
                let mut host = TcpHost::new(&config.host).with_tls_verify(config.tls_verify);
                if let Some(ca) = non_empty(&config.tls_ca_cert) {
                    host = host.with_ca_cert(ca);
                }
                if let Some(cert) = non_empty(&config.tls_cert) {
                    host = host.with_cert(cert);
                }
                if let Some(key) = non_empty(&config.tls_key) {
                    host = host.with_key(key);
                }
                DockerHost::Tcp(host)
            }
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            DockerHost::Ssh(_) => Scheme::Ssh,
            DockerHost::Tcp(_) => Scheme::Tcp,
        }
    }
}

impl Provisioner for DockerHost {
    fn provision(&mut self, context_dir: &Path) -> Result<EnvMap, HostError> {
        match self {
            DockerHost::Ssh(host) => host.provision(context_dir),
            DockerHost::Tcp(host) => host.provision(context_dir),
        }
    }

    fn cleanup(&mut self) -> Result<(), HostError> {
        match self {
            DockerHost::Ssh(host) => host.cleanup(),
            DockerHost::Tcp(host) => host.cleanup(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
