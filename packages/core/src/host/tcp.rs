//! TCP Docker hosts
//!
//! The descriptor is handed to Docker verbatim. When TLS verification is
//! requested the PEM material is written to a per-run cert directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::HostError;
use super::fs::{create_private_dir, write_read_only_file};
use super::provision::{DOCKER_CERT_PATH, DOCKER_HOST, DOCKER_TLS_VERIFY, EnvMap, Provisioner};

/// Directory under the context dir holding the TLS material
pub const CERT_DIR_NAME: &str = "docker-cert";

/// TCP host with optional TLS client credentials
#[derive(Default)]
pub struct TcpHost {
    host: String,
    tls_verify: bool,
    ca_cert: Option<String>,
    cert: Option<String>,
    key: Option<String>,

    /// Set once provisioning has started creating the cert directory
    cert_path: Option<PathBuf>,
}

impl TcpHost {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: request TLS verification
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Builder pattern: set CA certificate PEM
    pub fn with_ca_cert(mut self, pem: impl Into<String>) -> Self {
        self.ca_cert = Some(pem.into());
        self
    }

    /// Builder pattern: set client certificate PEM
    pub fn with_cert(mut self, pem: impl Into<String>) -> Self {
        self.cert = Some(pem.into());
        self
    }

    /// Builder pattern: set client key PEM
    pub fn with_key(mut self, pem: impl Into<String>) -> Self {
        self.key = Some(pem.into());
        self
    }

    /// Cert directory, if provisioned
    pub fn cert_path(&self) -> Option<&Path> {
        self.cert_path.as_deref()
    }

    fn create_files(&self, cert_path: &Path) -> Result<(), HostError> {
        create_private_dir(cert_path)?;

        let files = [
            ("ca.pem", &self.ca_cert, "CA cert"),
            ("cert.pem", &self.cert, "cert"),
            ("key.pem", &self.key, "key"),
        ];

        for (file_name, pem, label) in files {
            let Some(pem) = pem.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };
            write_read_only_file(&cert_path.join(file_name), pem.as_bytes()).inspect_err(|e| {
                tracing::error!("Create {} file failed: {}", label, e);
            })?;
        }

        Ok(())
    }
}

impl Provisioner for TcpHost {
    fn provision(&mut self, context_dir: &Path) -> Result<EnvMap, HostError> {
        let mut envs = EnvMap::new();
        envs.insert(DOCKER_HOST.to_string(), self.host.clone());

        if self.tls_verify {
            let cert_path = context_dir.join(CERT_DIR_NAME);
            // Recorded before any file exists so a partial failure is still cleaned up
            self.cert_path = Some(cert_path.clone());
            self.create_files(&cert_path)?;

            envs.insert(DOCKER_TLS_VERIFY.to_string(), "1".to_string());
            envs.insert(
                DOCKER_CERT_PATH.to_string(),
                cert_path.to_string_lossy().into_owned(),
            );
        }

        Ok(envs)
    }

    fn cleanup(&mut self) -> Result<(), HostError> {
        let Some(cert_path) = self.cert_path.take() else {
            return Ok(());
        };

        if let Err(e) = fs::remove_dir_all(&cert_path) {
            tracing::warn!("Remove cert path {} error: {}", cert_path.display(), e);
        } else {
            tracing::debug!("Removed cert path: {}", cert_path.display());
        }

        Ok(())
    }
}
