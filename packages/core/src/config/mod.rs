//! Configuration for docker-remote
//!
//! Run configuration supplied by the CLI, path resolution for the user's
//! SSH config, and env-file loading for the script environment.

pub mod env_file;
pub mod paths;
mod schema;

pub use env_file::{load_env_file, parse_env};
pub use paths::{TEMP_CONTEXT_PREFIX, get_ssh_config_path, get_ssh_dir};
pub use schema::RunConfig;
