//! Run configuration
//!
//! Everything a single provision → script → cleanup run needs. The CLI
//! fills this in from flags and `PLUGIN_*` environment variables.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Configuration for one run
#[derive(Clone, Default, PartialEq)]
pub struct RunConfig {
    /// Host descriptor (`ssh://user@host:port`, `tcp://host:port`, `host:port`)
    pub host: String,

    /// SSH user when the descriptor has none
    pub ssh_user: Option<String>,

    /// SSH private key contents
    pub ssh_key: Option<String>,

    /// Enable TLS verification for TCP hosts
    pub tls_verify: bool,

    /// TLS CA certificate PEM
    pub tls_ca_cert: Option<String>,

    /// TLS client certificate PEM
    pub tls_cert: Option<String>,

    /// TLS client key PEM
    pub tls_key: Option<String>,

    /// Caller-owned context directory (default: fresh temp dir)
    pub context_dir: Option<PathBuf>,

    /// Keep provisioned files and the context dir after the run
    pub keep_context: bool,

    /// Stop the script at the first failing command
    pub error_exit: bool,

    /// Script lines, joined with newlines
    pub script: Vec<String>,

    /// Extra variables for the script (typically from an env file)
    pub extra_env: BTreeMap<String, String>,

    /// SSH config to patch instead of `~/.ssh/config`
    pub ssh_config_path: Option<PathBuf>,
}

impl RunConfig {
    /// Create a config for `host` with everything else defaulted
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set fallback SSH user
    pub fn with_ssh_user(mut self, user: impl Into<String>) -> Self {
        self.ssh_user = Some(user.into());
        self
    }

    /// Builder pattern: set SSH private key
    pub fn with_ssh_key(mut self, key: impl Into<String>) -> Self {
        self.ssh_key = Some(key.into());
        self
    }

    /// Builder pattern: enable or disable TLS verification
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Builder pattern: set TLS CA certificate
    pub fn with_tls_ca_cert(mut self, pem: impl Into<String>) -> Self {
        self.tls_ca_cert = Some(pem.into());
        self
    }

    /// Builder pattern: set TLS client certificate
    pub fn with_tls_cert(mut self, pem: impl Into<String>) -> Self {
        self.tls_cert = Some(pem.into());
        self
    }

    /// Builder pattern: set TLS client key
    pub fn with_tls_key(mut self, pem: impl Into<String>) -> Self {
        self.tls_key = Some(pem.into());
        self
    }

    /// Builder pattern: use a caller-owned context directory
    pub fn with_context_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context_dir = Some(dir.into());
        self
    }

    /// Builder pattern: keep provisioned files after the run
    pub fn with_keep_context(mut self, keep: bool) -> Self {
        self.keep_context = keep;
        self
    }

    /// Builder pattern: stop the script on the first error
    pub fn with_error_exit(mut self, error_exit: bool) -> Self {
        self.error_exit = error_exit;
        self
    }

    /// Builder pattern: add a script line
    pub fn with_script_line(mut self, line: impl Into<String>) -> Self {
        self.script.push(line.into());
        self
    }

    /// Builder pattern: add extra script environment
    pub fn with_extra_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.extra_env.extend(env);
        self
    }

    /// Builder pattern: patch a different SSH config file
    pub fn with_ssh_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_config_path = Some(path.into());
        self
    }

    /// The full script, one command per line
    pub fn script_text(&self) -> String {
        self.script.join("\n")
    }
}

// Credentials never reach logs
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");

        f.debug_struct("RunConfig")
            .field("host", &self.host)
            .field("ssh_user", &self.ssh_user)
            .field("ssh_key", &redact(&self.ssh_key))
            .field("tls_verify", &self.tls_verify)
            .field("tls_ca_cert", &redact(&self.tls_ca_cert))
            .field("tls_cert", &redact(&self.tls_cert))
            .field("tls_key", &redact(&self.tls_key))
            .field("context_dir", &self.context_dir)
            .field("keep_context", &self.keep_context)
            .field("error_exit", &self.error_exit)
            .field("script", &self.script)
            .field("extra_env", &self.extra_env.keys().collect::<Vec<_>>())
            .field("ssh_config_path", &self.ssh_config_path)
            .finish()
    }
}
