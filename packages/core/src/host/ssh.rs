//! SSH Docker hosts
//!
//! Docker's `ssh://` transport shells out to `ssh`, so instead of running
//! a tunnel we teach the user's SSH client about a per-run host alias:
//! an identity file and `Host` fragment under the context dir, plus an
//! `Include` of that fragment spliced into `~/.ssh/config`.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::HostError;
use super::fs::{create_private_dir, write_read_only_file};
use super::provision::{DOCKER_HOST, EnvMap, Provisioner};
use super::spec::HostSpec;
use super::ssh_config::{HostSection, MarkerBlock, SshConfigFile, next_section_id, resolve_alias};

/// Directory under the context dir holding the SSH material
pub const WORK_DIR_NAME: &str = "docker-ssh";
/// Identity file name inside the work dir
pub const KEY_FILE_NAME: &str = "ssh-key";
/// Host fragment name inside the work dir
pub const FRAGMENT_FILE_NAME: &str = "ssh_host_config";

/// Provisioning progress of an [`SshHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshHostState {
    Unprovisioned,
    KeyWritten,
    ConfigWritten,
    IncludeAppended,
    IncludeRemoved,
    WorkDirRemoved,
}

/// SSH host reached through a generated SSH client alias
pub struct SshHost {
    host: String,
    key: Option<String>,
    default_user: Option<String>,
    ssh_config_path: Option<PathBuf>,

    state: SshHostState,
    work_dir: Option<PathBuf>,
    section_id: Option<String>,
    fragment_path: Option<PathBuf>,
    /// Present only while our block is in the user's config
    patched: Option<(SshConfigFile, MarkerBlock)>,
}

impl SshHost {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            key: None,
            default_user: None,
            ssh_config_path: None,
            state: SshHostState::Unprovisioned,
            work_dir: None,
            section_id: None,
            fragment_path: None,
            patched: None,
        }
    }

    /// Builder pattern: set private key contents
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Builder pattern: user for descriptors without one
    pub fn with_default_user(mut self, user: impl Into<String>) -> Self {
        self.default_user = Some(user.into());
        self
    }

    /// Builder pattern: patch this SSH config instead of `~/.ssh/config`
    pub fn with_ssh_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_config_path = Some(path.into());
        self
    }

    pub fn state(&self) -> SshHostState {
        self.state
    }

    /// Host alias of the current run, once provisioned
    pub fn section_id(&self) -> Option<&str> {
        self.section_id.as_deref()
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    pub fn fragment_path(&self) -> Option<&Path> {
        self.fragment_path.as_deref()
    }

    fn config_file(&self) -> Result<SshConfigFile, HostError> {
        match &self.ssh_config_path {
            Some(path) => Ok(SshConfigFile::with_path(path)),
            None => SshConfigFile::user_default(),
        }
    }

    fn create_ssh_key(&mut self, work_dir: &Path) -> Result<Option<PathBuf>, HostError> {
        let Some(key) = self.key.as_deref().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };

        // ssh rejects keys without a trailing line feed
        let mut key = key.to_string();
        if !key.ends_with('\n') {
            key.push('\n');
        }

        let key_path = work_dir.join(KEY_FILE_NAME);
        write_read_only_file(&key_path, key.as_bytes())
            .inspect_err(|e| tracing::error!("Create SSH key file failed: {}", e))?;

        self.state = SshHostState::KeyWritten;
        Ok(Some(key_path))
    }

    fn create_ssh_config(
        &mut self,
        section: &HostSection,
        work_dir: &Path,
    ) -> Result<PathBuf, HostError> {
        let fragment_path = work_dir.join(FRAGMENT_FILE_NAME);
        write_read_only_file(&fragment_path, section.render().as_bytes())
            .inspect_err(|e| tracing::error!("Create SSH config file failed: {}", e))?;

        match resolve_alias(&fragment_path, &section.section_id) {
            Ok(resolved) => {
                tracing::debug!("SSH alias {} resolves to {:?}", section.section_id, resolved);
            }
            Err(e) => tracing::warn!("Could not read back {}: {}", fragment_path.display(), e),
        }

        self.fragment_path = Some(fragment_path.clone());
        self.state = SshHostState::ConfigWritten;
        Ok(fragment_path)
    }

    fn append_include(&mut self, section_id: &str, fragment_path: &Path) -> Result<(), HostError> {
        let config_file = self.config_file()?;
        let marker = MarkerBlock::new(section_id);

        config_file
            .append(&marker.render(fragment_path))
            .inspect_err(|e| tracing::error!("Patch user SSH config error: {}", e))?;

        tracing::info!(
            "Added SSH alias '{}' to {}",
            section_id,
            config_file.path().display()
        );

        self.patched = Some((config_file, marker));
        self.state = SshHostState::IncludeAppended;
        Ok(())
    }

    fn remove_include(&mut self) -> Result<(), HostError> {
        let Some((config_file, marker)) = self.patched.take() else {
            return Ok(());
        };

        config_file
            .remove_block(&marker)
            .inspect_err(|e| tracing::error!("Remove SSH config include error: {}", e))?;

        self.state = SshHostState::IncludeRemoved;
        Ok(())
    }

    fn remove_work_dir(&mut self) {
        let Some(work_dir) = self.work_dir.take() else {
            return;
        };

        if let Err(e) = fs::remove_dir_all(&work_dir) {
            tracing::warn!("Remove SSH work dir {} error: {}", work_dir.display(), e);
        } else {
            tracing::debug!("Removed SSH work dir: {}", work_dir.display());
        }

        self.fragment_path = None;
        self.state = SshHostState::WorkDirRemoved;
    }
}

impl Provisioner for SshHost {
    fn provision(&mut self, context_dir: &Path) -> Result<EnvMap, HostError> {
        let spec = HostSpec::parse(&self.host)
            .inspect_err(|e| tracing::error!("Host parse error for \"{}\": {}", self.host, e))?;

        let username = spec.username.clone().or_else(|| self.default_user.clone());

        let work_dir = context_dir.join(WORK_DIR_NAME);
        // Recorded before creation so a partial failure is still cleaned up
        self.work_dir = Some(work_dir.clone());
        create_private_dir(&work_dir)?;

        let identity_file = self.create_ssh_key(&work_dir)?;

        let section = HostSection {
            section_id: next_section_id(),
            hostname: spec.hostname,
            port: spec.port,
            username,
            identity_file,
        };
        self.section_id = Some(section.section_id.clone());

        let fragment_path = self.create_ssh_config(&section, &work_dir)?;
        self.append_include(&section.section_id, &fragment_path)?;

        let mut envs = EnvMap::new();
        envs.insert(
            DOCKER_HOST.to_string(),
            format!("ssh://{}", section.section_id),
        );
        Ok(envs)
    }

    /// Remove our include block, then the work dir
    ///
    /// A failed config rewrite is returned, but only after the work dir
    /// removal has been attempted.
    fn cleanup(&mut self) -> Result<(), HostError> {
        let result = self.remove_include();
        self.remove_work_dir();
        result
    }
}
