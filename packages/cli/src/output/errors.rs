//! Error display
//!
//! Formats run failures for people reading CI logs: a headline, the
//! underlying message, and a tip when the cause is usually a config mistake.

use console::style;
use docker_remote_core::{HostError, RunError};

use super::colors::exit_code_style;

/// Headline and optional tip for a run failure
pub fn describe_run_error(err: &RunError) -> (&'static str, Option<&'static str>) {
    match err {
        RunError::Host(e) if e.is_parse_error() => (
            "Invalid docker host",
            Some("Use ssh://[user@]host[:port], tcp://host:port or host:port."),
        ),
        RunError::Host(HostError::HomeDirUnavailable) => (
            "Could not locate SSH config",
            Some("Ensure HOME is set for the user running the step."),
        ),
        RunError::Host(
            HostError::SshConfigRead(_)
            | HostError::SshConfigWrite(_)
            | HostError::ConfigPatch(_),
        ) => (
            "Failed to update SSH config",
            Some("Check that ~/.ssh/config is writable."),
        ),
        RunError::Host(_) => ("Failed to provision docker host", None),
        RunError::ContextDir(_) => (
            "Failed to prepare context directory",
            Some("Check permissions for the context dir, or leave it unset to use a temp dir."),
        ),
        RunError::Script { .. } => ("Script failed", None),
        RunError::Spawn(_) => ("Failed to start script", None),
    }
}

/// Print a run failure to stderr
pub fn show_run_error(err: &RunError) {
    let (headline, tip) = describe_run_error(err);

    eprintln!("{} {}", style("Error:").red().bold(), headline);
    eprintln!();
    eprintln!("  {}", err);

    if let RunError::Script { code: Some(code) } = err {
        eprintln!("  Exit code: {}", exit_code_style(*code));
    }

    if let Some(tip) = tip {
        eprintln!();
        eprintln!("  {} {}", style("Tip:").cyan(), tip);
    }
}

/// Print any other failure to stderr
pub fn show_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", style("Error:").red().bold(), err);
}
