//! Host descriptor parsing
//!
//! Splits a descriptor such as `ssh://alice@build-host:2222` into its
//! scheme, hostname, port and username.

use serde::{Deserialize, Serialize};

use super::error::HostError;

/// Transport used to reach the remote Docker engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain or TLS-protected TCP socket
    Tcp,
    /// Docker's `ssh://` transport
    Ssh,
}

impl Scheme {
    /// Determine the scheme from a raw descriptor
    ///
    /// Descriptors without a `://` separator default to `tcp`.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, HostError> {
        match descriptor.find("://") {
            None => Ok(Scheme::Tcp),
            Some(index) => match &descriptor[..index] {
                "tcp" => Ok(Scheme::Tcp),
                "ssh" => Ok(Scheme::Ssh),
                other => Err(HostError::UnsupportedScheme(other.to_string())),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Tcp => "tcp",
            Scheme::Ssh => "ssh",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed host descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSpec {
    pub scheme: Scheme,
    /// Never empty
    pub hostname: String,
    pub port: Option<String>,
    pub username: Option<String>,
}

impl HostSpec {
    /// Parse a `scheme://[user@]host[:port]` descriptor
    ///
    /// A password in the user info and any trailing path are ignored.
    /// When the authority cannot be split into host and port, the whole
    /// authority is used as the hostname.
    pub fn parse(descriptor: &str) -> Result<Self, HostError> {
        let scheme = Scheme::from_descriptor(descriptor)?;

        let rest = descriptor
            .split_once("://")
            .map_or(descriptor, |(_, rest)| rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();

        let (userinfo, host_port) = match authority.rsplit_once('@') {
            Some((userinfo, host_port)) => (Some(userinfo), host_port),
            None => (None, authority),
        };

        let username = userinfo
            .map(|info| info.split_once(':').map_or(info, |(user, _)| user))
            .filter(|user| !user.is_empty())
            .map(str::to_string);

        let (hostname, port) = match split_host_port(host_port) {
            Some(parts) => parts,
            None => {
                tracing::debug!(
                    "Host port parse error for \"{}\", using it as host name",
                    host_port
                );
                (host_port.to_string(), None)
            }
        };

        if let Some(port) = &port {
            if !port.chars().all(|c| c.is_ascii_digit()) {
                return Err(HostError::InvalidDescriptor(
                    descriptor.to_string(),
                    format!("invalid port \"{port}\""),
                ));
            }
        }

        if hostname.is_empty() {
            return Err(HostError::EmptyHostname(descriptor.to_string()));
        }

        Ok(Self {
            scheme,
            hostname,
            port,
            username,
        })
    }
}

/// Split `host:port`, `[v6]:port` or `[v6]`
///
/// Returns `None` when there is no port separator or the colons are
/// ambiguous (bare IPv6). An empty port after `:` yields `None` as port.
fn split_host_port(host_port: &str) -> Option<(String, Option<String>)> {
    let non_empty = |port: &str| (!port.is_empty()).then(|| port.to_string());

    if let Some(bracketed) = host_port.strip_prefix('[') {
        let (host, remaining) = bracketed.split_once(']')?;
        return match remaining {
            "" => Some((host.to_string(), None)),
            _ => {
                let port = remaining.strip_prefix(':')?;
                Some((host.to_string(), non_empty(port)))
            }
        };
    }

    let (host, port) = host_port.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host.to_string(), non_empty(port)))
}
