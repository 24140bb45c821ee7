//! SSH config fragments and marker blocks
//!
//! Each run writes a private `Host` fragment and splices an `Include` for
//! it into the user's SSH config, wrapped in start/end marker comments
//! keyed by the run's section ID so it can be cut out again later.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use ssh2_config::{ParseRule, SshConfig};

use super::error::HostError;
use super::fs::{PRIVATE_DIR_MODE, set_mode};
use crate::config::paths::get_ssh_config_path;

/// Prefix of every generated host alias
pub const SECTION_PREFIX: &str = "docker-remote-";

const MARKER_START: &str = "### DOCKER_REMOTE_START";
const MARKER_END: &str = "### DOCKER_REMOTE_END";
const MARKER_NOTE: &str =
    "These lines are added by docker-remote automatically, which can be safely removed";

/// Options appended to every generated host section
const COMMON_OPTIONS: [(&str, &str); 5] = [
    ("StrictHostKeyChecking", "no"),
    ("UserKnownHostsFile", "/dev/null"),
    ("ControlMaster", "auto"),
    ("ControlPath", "~/.ssh/control-%C"),
    ("ControlPersist", "30s"),
];

/// Column width option names are padded to
const LABEL_WIDTH: usize = 25;

/// Mode for an SSH config file this crate creates
const CONFIG_FILE_MODE: u32 = 0o600;

static LAST_SECTION_NANOS: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh `docker-remote-<nanos>` section ID
///
/// IDs come from the wall clock in nanoseconds and are strictly
/// increasing within the process, even if the clock is coarse or steps
/// backwards.
pub fn next_section_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or_default();

    let previous = LAST_SECTION_NANOS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or(now);

    format!("{SECTION_PREFIX}{}", now.max(previous.saturating_add(1)))
}

/// One generated `Host` stanza
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSection {
    pub section_id: String,
    pub hostname: String,
    pub port: Option<String>,
    pub username: Option<String>,
    pub identity_file: Option<PathBuf>,
}

impl HostSection {
    /// Render the stanza, skipping empty fields
    pub fn render(&self) -> String {
        let identity = self
            .identity_file
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned());

        let fields = [
            ("HostName", Some(self.hostname.as_str())),
            ("Port", self.port.as_deref()),
            ("User", self.username.as_deref()),
            ("IdentityFile", identity.as_deref()),
        ];

        let mut out = format!("Host {}\n", self.section_id);
        let mut push_option = |label: &str, value: &str| {
            out.push_str(&format!("  {label:<width$}{value}\n", width = LABEL_WIDTH));
        };

        for (label, value) in fields {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                push_option(label, value);
            }
        }
        for (label, value) in COMMON_OPTIONS {
            push_option(label, value);
        }

        out
    }
}

/// Start/end marker pair for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBlock {
    start_line: String,
    end_line: String,
}

impl MarkerBlock {
    pub fn new(section_id: &str) -> Self {
        Self {
            start_line: format!("{MARKER_START} {section_id} -- {MARKER_NOTE}"),
            end_line: format!("{MARKER_END} {section_id}"),
        }
    }

    pub fn start_line(&self) -> &str {
        &self.start_line
    }

    pub fn end_line(&self) -> &str {
        &self.end_line
    }

    /// Render the block that includes `fragment_path`, leading blank line included
    pub fn render(&self, fragment_path: &Path) -> String {
        format!(
            "\n{}\nMatch all\nInclude  {}\n{}\n",
            self.start_line,
            fragment_path.display(),
            self.end_line
        )
    }

    /// Return `content` with this block cut out
    ///
    /// Everything from the newline before the start marker through the
    /// newline after the end marker goes; blocks with other IDs stay.
    pub fn remove_from(&self, content: &str) -> Result<String, HostError> {
        let pattern = format!(
            r"(?s)\n{}\n.*?\n{}\n",
            regex::escape(&self.start_line),
            regex::escape(&self.end_line)
        );
        tracing::debug!("Replace pattern: {}", pattern);

        let re = Regex::new(&pattern)
            .map_err(|e| HostError::ConfigPatch(format!("Compile regex pattern error: {e}")))?;

        Ok(re.replace_all(content, "").into_owned())
    }
}

/// The user's persistent SSH client config
#[derive(Debug, Clone)]
pub struct SshConfigFile {
    path: PathBuf,
}

impl SshConfigFile {
    /// `~/.ssh/config` for the current user
    pub fn user_default() -> Result<Self, HostError> {
        get_ssh_config_path()
            .map(Self::with_path)
            .ok_or(HostError::HomeDirUnavailable)
    }

    /// Config file at an arbitrary path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `block` with a single write
    ///
    /// Creates the parent directory (700) and the file (600) if missing.
    pub fn append(&self, block: &str) -> Result<(), HostError> {
        if let Some(ssh_dir) = self.path.parent() {
            if !ssh_dir.exists() {
                fs::create_dir_all(ssh_dir).map_err(|e| {
                    HostError::SshConfigWrite(format!(
                        "Failed to create {}: {}",
                        ssh_dir.display(),
                        e
                    ))
                })?;
                set_mode(ssh_dir, PRIVATE_DIR_MODE)?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(CONFIG_FILE_MODE);
        }

        let mut file = options.open(&self.path).map_err(|e| {
            HostError::SshConfigWrite(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        file.write_all(block.as_bytes()).map_err(|e| {
            HostError::SshConfigWrite(format!(
                "Failed to write to {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Patched SSH config at {}", self.path.display());
        Ok(())
    }

    /// Cut `marker`'s block out of the file, rewriting it in place
    ///
    /// Returns whether the block was found. The file is truncated and
    /// rewritten rather than replaced, so its permissions are kept. A write
    /// failing after the truncate leaves the file empty or partially written.
    pub fn remove_block(&self, marker: &MarkerBlock) -> Result<bool, HostError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            HostError::SshConfigRead(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let stripped = marker.remove_from(&content)?;
        if stripped == content {
            tracing::warn!(
                "Marker block \"{}\" not found in {}",
                marker.start_line(),
                self.path.display()
            );
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| {
                HostError::SshConfigWrite(format!(
                    "Failed to open {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        file.write_all(stripped.as_bytes()).map_err(|e| {
            HostError::SshConfigWrite(format!(
                "Write SSH config new content to {} error: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Removed marker block from {}", self.path.display());
        Ok(true)
    }
}

/// Settings an SSH client resolves for an alias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedHost {
    pub host_name: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub identity_file: Option<PathBuf>,
}

/// Parse an SSH config file and resolve `alias` the way `ssh` would
pub fn resolve_alias(config_path: &Path, alias: &str) -> Result<ResolvedHost, HostError> {
    let file = File::open(config_path).map_err(|e| {
        HostError::SshConfigRead(format!("Failed to open {}: {}", config_path.display(), e))
    })?;

    let mut reader = BufReader::new(file);

    let config = SshConfig::default()
        .parse(
            &mut reader,
            ParseRule::ALLOW_UNKNOWN_FIELDS | ParseRule::ALLOW_UNSUPPORTED_FIELDS,
        )
        .map_err(|e| HostError::SshConfigRead(format!("Failed to parse SSH config: {e}")))?;

    let params = config.query(alias);

    Ok(ResolvedHost {
        host_name: params.host_name,
        port: params.port,
        user: params.user,
        identity_file: params
            .identity_file
            .and_then(|files| files.into_iter().next()),
    })
}
