use std::fmt;
use std::time::Duration;

/// The four reachability checks run against every host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Icmp,
    Ssh,
    Http,
    Https,
}

impl Protocol {
    /// Column order used by the probe set and the table.
    pub const ALL: [Protocol; 4] = [Protocol::Icmp, Protocol::Ssh, Protocol::Http, Protocol::Https];

    /// TCP port checked for this protocol. ICMP has none.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Icmp => None,
            Self::Ssh => Some(22),
            Self::Http => Some(80),
            Self::Https => Some(443),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Icmp => 0,
            Self::Ssh => 1,
            Self::Http => 2,
            Self::Https => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Icmp => "ICMP",
            Self::Ssh => "SSH",
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProbeOutcome {
    Success,
    Failure,
    Timeout,
    #[default]
    Unknown,
}

/// Outcome of one probe against one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeResult {
    pub outcome: ProbeOutcome,
    pub latency: Option<Duration>,
}

impl ProbeResult {
    pub fn success(latency: Duration) -> Self {
        Self {
            outcome: ProbeOutcome::Success,
            latency: Some(latency),
        }
    }

    pub fn failure() -> Self {
        Self {
            outcome: ProbeOutcome::Failure,
            latency: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            outcome: ProbeOutcome::Timeout,
            latency: None,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}
