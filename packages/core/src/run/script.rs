//! Script execution
//!
//! The user's commands run under `/bin/sh` with trace output enabled,
//! sharing this process's stdout and stderr.

use std::process::Command;

use super::RunError;
use crate::host::EnvMap;

/// Shell used to run scripts
pub const SHELL: &str = "/bin/sh";

/// Runs the user's script against the provisioned environment
pub trait ScriptRunner {
    /// Run `script` with `env` layered over the inherited environment
    fn run_script(&self, script: &str, env: &EnvMap) -> Result<(), RunError>;
}

/// Runs scripts through `/bin/sh -c -x [-e]`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellScript {
    /// Pass `-e` so the shell stops at the first failing command
    pub error_exit: bool,
}

impl ShellScript {
    pub fn new(error_exit: bool) -> Self {
        Self { error_exit }
    }

    fn command(&self, script: &str, env: &EnvMap) -> Command {
        let mut cmd = Command::new(SHELL);
        cmd.args(["-c", "-x"]);
        if self.error_exit {
            cmd.arg("-e");
        }
        cmd.arg(script).envs(env);
        cmd
    }
}

impl ScriptRunner for ShellScript {
    fn run_script(&self, script: &str, env: &EnvMap) -> Result<(), RunError> {
        tracing::debug!("Running script with {} (error_exit={})", SHELL, self.error_exit);

        let status = self.command(script, env).status().map_err(|e| {
            tracing::error!("Script execution error: {}", e);
            RunError::Spawn(format!("Failed to start {SHELL}: {e}"))
        })?;

        if status.success() {
            return Ok(());
        }

        tracing::error!("Script execution error: {}", status);
        Err(RunError::Script {
            code: status.code(),
        })
    }
}
