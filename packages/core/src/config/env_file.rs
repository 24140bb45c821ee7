//! Dotenv-style env file loading
//!
//! Reads `KEY=VALUE` lines into a map that is layered under the
//! provisioned Docker variables when the script runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

/// Load variables from `path`
///
/// A missing file yields an empty map, so a default `.env` path is safe.
pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Env file not found, skipping: {}", path.display());
            return Ok(BTreeMap::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read env file: {}", path.display()));
        }
    };

    let vars = parse_env(&contents);
    tracing::debug!("Loaded {} variables from {}", vars.len(), path.display());
    Ok(vars)
}

/// Parse env file content
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is
/// allowed, and one pair of matching quotes around a value is stripped.
/// Lines without `=` are ignored.
pub fn parse_env(content: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!("Skipping env line without '=': {}", line);
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
