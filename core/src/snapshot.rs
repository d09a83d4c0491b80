//! Builds the host list for one discovery cycle.
//!
//! Records missing either address are dropped, the rest are sorted by their
//! `Name` tag and get their probes started immediately. The sort is stable,
//! so the row numbers an operator types always refer to the same order for
//! the same inventory answer.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jumpr_common::config::AddressPreference;
use jumpr_common::network::record::RawRecord;
use jumpr_common::network::state::InstanceState;
use tracing::debug;

use crate::probe::{ProbeEngine, ProbeSet};

pub const NAME_TAG: &str = "Name";

#[derive(Debug)]
pub struct Host {
    pub id: String,
    pub private_ip: IpAddr,
    pub public_ip: IpAddr,
    pub segment: Option<String>,
    pub state: InstanceState,
    pub uptime: Duration,
    pub tags: BTreeMap<String, String>,
    pub probes: ProbeSet,
}

impl Host {
    /// Value of the `Name` tag, or an empty string.
    pub fn name(&self) -> &str {
        self.tags.get(NAME_TAG).map(String::as_str).unwrap_or_default()
    }

    /// The id without its `i-` prefix, as shown in the table.
    pub fn short_id(&self) -> &str {
        self.id.strip_prefix("i-").unwrap_or(&self.id)
    }

    pub fn preferred_ip(&self, preference: AddressPreference) -> IpAddr {
        match preference {
            AddressPreference::Private => self.private_ip,
            AddressPreference::Public => self.public_ip,
        }
    }
}

#[derive(Debug, Default)]
pub struct Snapshot {
    pub hosts: Vec<Host>,
    /// Instance id of the host the inventory was queried from, if known.
    pub bastion_id: Option<String>,
    /// Network segment of that host, when its record was in the answer.
    pub bastion_segment: Option<String>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

pub struct SnapshotBuilder<'a> {
    engine: &'a ProbeEngine,
    bastion_id: Option<String>,
    now: DateTime<Utc>,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(engine: &'a ProbeEngine) -> Self {
        Self {
            engine,
            bastion_id: None,
            now: Utc::now(),
        }
    }

    /// Restricts the snapshot to the network segment of `bastion_id`, if that
    /// instance shows up in the records.
    pub fn bastion(mut self, bastion_id: Option<String>) -> Self {
        self.bastion_id = bastion_id;
        self
    }

    /// Reference time for uptimes.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn build(self, records: Vec<RawRecord>) -> Snapshot {
        let bastion_segment = self.bastion_segment(&records);

        let mut candidates: Vec<(String, RawRecord, IpAddr, IpAddr)> = records
            .into_iter()
            .filter_map(|record| {
                let (private_ip, public_ip) = (record.private_ip?, record.public_ip?);
                let name = record.tag_map().remove(NAME_TAG).unwrap_or_default();
                Some((name, record, private_ip, public_ip))
            })
            .collect();

        candidates.sort_by(|(a, ..), (b, ..)| a.cmp(b));

        if let Some(segment) = &bastion_segment {
            candidates.retain(|(_, record, ..)| record.segment.as_ref() == Some(segment));
        }

        let hosts: Vec<Host> = candidates
            .into_iter()
            .map(|(_, record, private_ip, public_ip)| self.materialize(record, private_ip, public_ip))
            .collect();

        debug!(hosts = hosts.len(), segment = ?bastion_segment, "snapshot built");

        Snapshot {
            hosts,
            bastion_id: self.bastion_id,
            bastion_segment,
        }
    }

    fn bastion_segment(&self, records: &[RawRecord]) -> Option<String> {
        let bastion_id = self.bastion_id.as_deref()?;
        records
            .iter()
            .find(|record| record.id == bastion_id)
            .and_then(|record| record.segment.clone())
            .filter(|segment| !segment.is_empty())
    }

    fn materialize(&self, record: RawRecord, private_ip: IpAddr, public_ip: IpAddr) -> Host {
        let uptime = record
            .launch_time
            .and_then(|launched| (self.now - launched).to_std().ok())
            .unwrap_or_default();

        Host {
            tags: record.tag_map(),
            state: InstanceState::from_name(&record.state),
            probes: self.engine.probe_all(private_ip),
            id: record.id,
            private_ip,
            public_ip,
            segment: record.segment,
            uptime,
        }
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
