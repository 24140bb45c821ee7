//! Path resolution for docker-remote
//!
//! The only persistent location this crate touches is the user's SSH
//! client config. Everything else lives under a per-run context directory.

use std::path::PathBuf;

/// Prefix for system-created temporary context directories
pub const TEMP_CONTEXT_PREFIX: &str = "docker-remote-";

/// Get the user's SSH directory
///
/// Returns: `~/.ssh`
pub fn get_ssh_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh"))
}

/// Get the path to the user's SSH config file
///
/// Returns: `~/.ssh/config`
pub fn get_ssh_config_path() -> Option<PathBuf> {
    get_ssh_dir().map(|dir| dir.join("config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ssh_config_path() {
        let path = get_ssh_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.ends_with(".ssh/config"));
    }

    #[test]
    fn test_ssh_dir_is_parent_of_config() {
        let dir = get_ssh_dir().unwrap();
        let config = get_ssh_config_path().unwrap();
        assert_eq!(config.parent(), Some(dir.as_path()));
    }
}
