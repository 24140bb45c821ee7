//! docker-remote CLI - Run scripts against a remote Docker engine
//!
//! Every flag can also be supplied as a `PLUGIN_*` environment variable so
//! the binary works unchanged as a CI plugin step.

mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use docker_remote_core::{RunConfig, ShellScript, get_version_long, load_env_file};

/// Run a script against a remote Docker engine over SSH or TCP
#[derive(Parser)]
#[command(name = "docker-remote")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a script against a remote Docker engine over SSH or TCP", long_about = None)]
pub struct Cli {
    /// Log level (DEBUG, INFO, WARN, ERROR, FATAL)
    #[arg(short = 'l', long, env = "PLUGIN_LOG_LEVEL", default_value = "INFO")]
    log_level: String,

    /// Env file loaded into the script environment; ignored if missing
    #[arg(short = 'e', long, env = "PLUGIN_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Context directory for provisioned files (default: a temp dir)
    #[arg(long, env = "PLUGIN_CONTEXT_DIR")]
    context_dir: Option<String>,

    /// Keep provisioned files after the run
    #[arg(long, env = "PLUGIN_KEEP_CONTEXT")]
    keep_context: bool,

    /// Docker host: ssh://[user@]host[:port], tcp://host:port or host:port
    #[arg(short = 'H', long, env = "PLUGIN_HOST")]
    host: String,

    /// SSH user when the host has none
    #[arg(long, env = "PLUGIN_SSH_USER")]
    ssh_user: Option<String>,

    /// SSH private key contents
    #[arg(long, env = "PLUGIN_SSH_KEY", hide_env_values = true)]
    ssh_key: Option<String>,

    /// Use TLS and verify the remote
    #[arg(long, env = "PLUGIN_TLS_VERIFY")]
    tls_verify: bool,

    /// Trust certs signed only by this CA (PEM contents)
    #[arg(long, env = "PLUGIN_TLS_CA_CERT", hide_env_values = true)]
    tls_ca_cert: Option<String>,

    /// TLS certificate (PEM contents)
    #[arg(long, env = "PLUGIN_TLS_CERT", hide_env_values = true)]
    tls_cert: Option<String>,

    /// TLS key (PEM contents)
    #[arg(long, env = "PLUGIN_TLS_KEY", hide_env_values = true)]
    tls_key: Option<String>,

    /// Stop the script at the first failing command
    #[arg(long, env = "PLUGIN_ERROR_EXIT")]
    error_exit: bool,

    /// Script commands, run in order
    #[arg(long, env = "PLUGIN_SCRIPT", value_delimiter = ',')]
    script: Vec<String>,
}

impl Cli {
    /// Build the run configuration, loading the env file
    pub fn into_config(self) -> Result<RunConfig> {
        let extra_env = load_env_file(&self.env_file)?;

        let mut config = RunConfig::new(self.host)
            .with_tls_verify(self.tls_verify)
            .with_keep_context(self.keep_context)
            .with_error_exit(self.error_exit)
            .with_extra_env(extra_env);

        if let Some(user) = self.ssh_user {
            config = config.with_ssh_user(user);
        }
        if let Some(key) = self.ssh_key {
            config = config.with_ssh_key(key);
        }
        if let Some(ca) = self.tls_ca_cert {
            config = config.with_tls_ca_cert(ca);
        }
        if let Some(cert) = self.tls_cert {
            config = config.with_tls_cert(cert);
        }
        if let Some(key) = self.tls_key {
            config = config.with_tls_key(key);
        }
        // CI systems pass unset settings as empty strings
        if let Some(dir) = self.context_dir.filter(|d| !d.is_empty()) {
            config = config.with_context_dir(dir);
        }
        for line in self.script {
            config = config.with_script_line(line);
        }

        Ok(config)
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&cli.log_level);
    tracing::debug!("docker-remote {}", get_version_long());

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            output::show_error(&e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Run config: {:?}", config);

    let runner = ShellScript::new(config.error_exit);
    match docker_remote_core::run(&config, &runner) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::show_run_error(&e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
