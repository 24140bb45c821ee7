//! docker-remote CLI - Run scripts against a remote Docker engine
//!
//! This is the main entry point for the Rust CLI binary.

use std::process::ExitCode;

fn main() -> ExitCode {
    docker_remote::run()
}
