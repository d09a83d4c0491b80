use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_INVENTORY: &str = "http://127.0.0.1:8773/hosts";
pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254/latest/meta-data/instance-id";
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1_000);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be one of {expected}, got {value:?}")]
    InvalidChoice {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which of a host's two addresses is shown and used as the ssh target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressPreference {
    #[default]
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Draw once, read a selection, launch ssh.
    OneShot,
    /// Redraw on a fixed cadence until standard input closes.
    Watch,
}

/// When the bastion's network segment is used to narrow the host list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentFilter {
    #[default]
    InteractiveOnly,
    Always,
    Never,
}

impl SegmentFilter {
    pub fn applies(self, mode: RunMode) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::InteractiveOnly => mode == RunMode::OneShot,
        }
    }
}

pub struct Config {
    /// Show and connect to public addresses instead of private ones (`JUMP_PUBLIC`).
    pub address: AddressPreference,
    /// Bastion used to tunnel the inventory query and to proxy ssh (`JUMP_BASTION`).
    pub bastion: Option<String>,
    /// ssh-agent socket. Absence only disables agent forwarding.
    pub agent_socket: Option<PathBuf>,
    /// Inventory location, either an `http://` URL or a JSON file path.
    pub inventory: String,
    /// Endpoint answering with the instance id of the querying host.
    pub metadata_url: String,
    pub segment_filter: SegmentFilter,
    /// Target duration of one watch cycle.
    pub interval: Duration,
    /// Upper bound for a single probe.
    pub probe_timeout: Duration,
    /// Cap on concurrently running probes. `None` fans out freely.
    pub max_probes: Option<usize>,
    pub ssh_program: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: AddressPreference::Private,
            bastion: None,
            agent_socket: None,
            inventory: DEFAULT_INVENTORY.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            segment_filter: SegmentFilter::default(),
            interval: DEFAULT_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_probes: None,
            ssh_program: "ssh".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Empty
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.is_empty());
        let defaults = Self::default();

        let address = match get("JUMP_PUBLIC") {
            Some(_) => AddressPreference::Public,
            None => AddressPreference::Private,
        };

        let segment_filter = match get("JUMP_SEGMENT_FILTER").as_deref() {
            None | Some("interactive") => SegmentFilter::InteractiveOnly,
            Some("always") => SegmentFilter::Always,
            Some("never") => SegmentFilter::Never,
            Some(other) => {
                return Err(ConfigError::InvalidChoice {
                    var: "JUMP_SEGMENT_FILTER",
                    value: other.to_string(),
                    expected: "interactive, always, never",
                });
            }
        };

        let interval = match get("JUMP_INTERVAL_MS") {
            Some(value) => Duration::from_millis(parse_positive("JUMP_INTERVAL_MS", &value)? as u64),
            None => defaults.interval,
        };

        let probe_timeout = match get("JUMP_PROBE_TIMEOUT_MS") {
            Some(value) => {
                Duration::from_millis(parse_positive("JUMP_PROBE_TIMEOUT_MS", &value)? as u64)
            }
            None => defaults.probe_timeout,
        };

        let max_probes = get("JUMP_MAX_PROBES")
            .map(|value| parse_positive("JUMP_MAX_PROBES", &value))
            .transpose()?;

        Ok(Self {
            address,
            bastion: get("JUMP_BASTION"),
            agent_socket: get("SSH_AUTH_SOCK").map(PathBuf::from),
            inventory: get("JUMP_INVENTORY").unwrap_or(defaults.inventory),
            metadata_url: get("JUMP_METADATA_URL").unwrap_or(defaults.metadata_url),
            segment_filter,
            interval,
            probe_timeout,
            max_probes,
            ssh_program: get("JUMP_SSH").unwrap_or(defaults.ssh_program),
        })
    }

    pub fn is_indirect(&self) -> bool {
        self.bastion.is_some()
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.address, AddressPreference::Private);
        assert!(cfg.bastion.is_none());
        assert!(cfg.agent_socket.is_none());
        assert_eq!(cfg.inventory, DEFAULT_INVENTORY);
        assert_eq!(cfg.interval, DEFAULT_INTERVAL);
        assert_eq!(cfg.segment_filter, SegmentFilter::InteractiveOnly);
        assert!(cfg.max_probes.is_none());
        assert!(!cfg.is_indirect());
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = config_from(&[("JUMP_PUBLIC", ""), ("JUMP_BASTION", "")]).unwrap();
        assert_eq!(cfg.address, AddressPreference::Private);
        assert!(cfg.bastion.is_none());
    }

    #[test]
    fn jump_variables_are_honoured() {
        let cfg = config_from(&[
            ("JUMP_PUBLIC", "1"),
            ("JUMP_BASTION", "ops@bastion.example:2222"),
            ("SSH_AUTH_SOCK", "/tmp/agent.sock"),
            ("JUMP_SEGMENT_FILTER", "always"),
            ("JUMP_INTERVAL_MS", "2500"),
            ("JUMP_MAX_PROBES", "16"),
        ])
        .unwrap();
        assert_eq!(cfg.address, AddressPreference::Public);
        assert_eq!(cfg.bastion.as_deref(), Some("ops@bastion.example:2222"));
        assert_eq!(cfg.agent_socket, Some(PathBuf::from("/tmp/agent.sock")));
        assert_eq!(cfg.segment_filter, SegmentFilter::Always);
        assert_eq!(cfg.interval, Duration::from_millis(2_500));
        assert_eq!(cfg.max_probes, Some(16));
        assert!(cfg.is_indirect());
    }

    #[test]
    fn rejects_bad_numbers_and_choices() {
        assert!(matches!(
            config_from(&[("JUMP_INTERVAL_MS", "0")]),
            Err(ConfigError::InvalidNumber { var: "JUMP_INTERVAL_MS", .. })
        ));
        assert!(matches!(
            config_from(&[("JUMP_MAX_PROBES", "lots")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config_from(&[("JUMP_SEGMENT_FILTER", "sometimes")]),
            Err(ConfigError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn segment_filter_respects_mode() {
        assert!(SegmentFilter::InteractiveOnly.applies(RunMode::OneShot));
        assert!(!SegmentFilter::InteractiveOnly.applies(RunMode::Watch));
        assert!(SegmentFilter::Always.applies(RunMode::Watch));
        assert!(!SegmentFilter::Never.applies(RunMode::OneShot));
    }
}
