//! Turns a snapshot into display rows, waiting on each host's probes in row
//! order. Drawing the rows is left to the terminal layer.

use std::net::IpAddr;
use std::time::Duration;

use jumpr_common::config::AddressPreference;
use jumpr_common::network::probe::ProbeResult;
use jumpr_common::network::state::InstanceState;

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based, the number the operator types to pick this host.
    pub number: usize,
    pub short_id: String,
    pub name: String,
    pub state: InstanceState,
    pub address: IpAddr,
    pub uptime: Duration,
    /// In [`jumpr_common::network::probe::Protocol::ALL`] order.
    pub probes: [ProbeResult; 4],
}

/// Consumes every probe handle in `snapshot`. A second call on the same
/// snapshot reads all probes as unknown.
pub async fn collect_rows(snapshot: &mut Snapshot, preference: AddressPreference) -> Vec<Row> {
    let mut rows = Vec::with_capacity(snapshot.len());
    for (idx, host) in snapshot.hosts.iter_mut().enumerate() {
        let probes = host.probes.take_all().await;
        rows.push(Row {
            number: idx + 1,
            short_id: host.short_id().to_string(),
            name: host.name().to_string(),
            state: host.state,
            address: host.preferred_ip(preference),
            uptime: host.uptime,
            probes,
        });
    }
    rows
}
