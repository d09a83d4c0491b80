//! Resolves a bastion address (`[user@]host[:port]`) into concrete connection
//! parameters, consulting `~/.ssh/config` the way `ssh` itself would for the
//! handful of directives the tunnel needs.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::TunnelError;

pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BastionTarget {
    /// The host part exactly as given, used for config lookup and display.
    pub alias: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Keys named by `IdentityFile`, in the order they were declared.
    pub identity_files: Vec<PathBuf>,
    /// Host keys the bastion is checked against.
    pub known_hosts: PathBuf,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Destination {
    user: Option<String>,
    host: String,
    port: Option<u16>,
}

impl Destination {
    fn parse(destination: &str) -> Result<Self, TunnelError> {
        let invalid = || TunnelError::InvalidTarget(destination.to_string());
        let destination = destination.trim();

        let (user, rest) = match destination.rsplit_once('@') {
            Some((user, rest)) if !user.is_empty() => (Some(user.to_string()), rest),
            Some(_) => return Err(invalid()),
            None => (None, destination),
        };

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let (host, after) = bracketed.split_once(']').ok_or_else(invalid)?;
            match after.strip_prefix(':') {
                Some(port) => (host, Some(port.parse().map_err(|_| invalid())?)),
                None if after.is_empty() => (host, None),
                None => return Err(invalid()),
            }
        } else {
            match rest.split_once(':') {
                Some((host, port)) => (host, Some(port.parse().map_err(|_| invalid())?)),
                None => (rest, None),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            user,
            host: host.to_string(),
            port,
        })
    }
}

/// Values collected from the blocks of an ssh config file that apply to one
/// host. The first value seen for a directive wins.
#[derive(Debug, Default)]
struct HostSettings {
    hostname: Option<String>,
    user: Option<String>,
    port: Option<u16>,
    identity_files: Vec<String>,
    known_hosts: Option<String>,
}

impl BastionTarget {
    /// Resolves `destination` against the user's `~/.ssh/config`, if there is one.
    pub fn resolve(destination: &str) -> Result<Self, TunnelError> {
        let config = dirs::home_dir()
            .map(|home| home.join(".ssh").join("config"))
            .and_then(|path| std::fs::read_to_string(path).ok())
            .unwrap_or_default();
        Self::with_ssh_config(destination, &config)
    }

    /// Resolves `destination` against the given ssh config text. Explicit user and
    /// port in `destination` take precedence over the file.
    pub fn with_ssh_config(destination: &str, config: &str) -> Result<Self, TunnelError> {
        let destination = Destination::parse(destination)?;
        let settings = lookup(config, &destination.host);

        let host = settings
            .hostname
            .map(|name| name.replace("%h", &destination.host))
            .unwrap_or_else(|| destination.host.clone());

        let target = Self {
            host,
            port: destination
                .port
                .or(settings.port)
                .unwrap_or(DEFAULT_SSH_PORT),
            user: destination
                .user
                .or(settings.user)
                .unwrap_or_else(whoami::username),
            identity_files: settings
                .identity_files
                .iter()
                .map(|path| expand_tilde(path))
                .collect(),
            known_hosts: settings
                .known_hosts
                .map(|path| expand_tilde(&path))
                .unwrap_or_else(default_known_hosts),
            alias: destination.host,
        };

        debug!(
            alias = %target.alias,
            host = %target.host,
            port = target.port,
            user = %target.user,
            "resolved bastion"
        );
        Ok(target)
    }
}

fn lookup(config: &str, alias: &str) -> HostSettings {
    let mut settings = HostSettings::default();
    // Directives before the first Host line apply to every host.
    let mut active = true;

    for line in config.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = split_directive(line) else {
            continue;
        };

        match key.to_ascii_lowercase().as_str() {
            "host" => active = host_matches(value, alias),
            "match" => active = false,
            _ if !active => {}
            "hostname" => {
                settings.hostname.get_or_insert_with(|| value.to_string());
            }
            "user" => {
                settings.user.get_or_insert_with(|| value.to_string());
            }
            "port" => {
                if settings.port.is_none() {
                    settings.port = value.parse().ok();
                }
            }
            "identityfile" => settings.identity_files.push(value.to_string()),
            // Only the first file of the list is consulted.
            "userknownhostsfile" => {
                if let Some(first) = value.split_whitespace().next() {
                    settings.known_hosts.get_or_insert_with(|| first.to_string());
                }
            }
            _ => {}
        }
    }

    settings
}

/// Splits `Key Value` or `Key=Value`, stripping surrounding quotes.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(|c: char| c == '=' || c.is_whitespace())?;
    let key = &line[..idx];
    let value = line[idx..].trim_start_matches(|c: char| c == '=' || c.is_whitespace());
    let value = value.trim().trim_matches('"');
    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

/// A `Host` line matches when any pattern matches and no `!`-negated
/// pattern does.
fn host_matches(patterns: &str, alias: &str) -> bool {
    let alias = alias.to_ascii_lowercase();
    let mut matched = false;
    for pattern in patterns.split_whitespace() {
        let pattern = pattern.to_ascii_lowercase();
        match pattern.strip_prefix('!') {
            Some(negated) if wildcard_match(negated.as_bytes(), alias.as_bytes()) => return false,
            Some(_) => {}
            None => matched |= wildcard_match(pattern.as_bytes(), alias.as_bytes()),
        }
    }
    matched
}

fn wildcard_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.first(), text.first()) {
        (None, None) => true,
        (Some(b'*'), _) => {
            wildcard_match(&pattern[1..], text)
                || (!text.is_empty() && wildcard_match(pattern, &text[1..]))
        }
        (Some(b'?'), Some(_)) => wildcard_match(&pattern[1..], &text[1..]),
        (Some(p), Some(t)) if p == t => wildcard_match(&pattern[1..], &text[1..]),
        _ => false,
    }
}

fn default_known_hosts() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".ssh")
        .join("known_hosts")
}

fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
