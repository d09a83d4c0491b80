use std::net::IpAddr;
use std::time::Duration;

use jumpr_common::network::probe::ProbeResult;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use tokio::time::timeout;
use tracing::debug;

const PAYLOAD: [u8; 56] = [0; 56];

/// One echo request, no retries. Hosts where no ICMP socket can be opened
/// report failure rather than an error.
pub async fn echo_probe(addr: IpAddr, limit: Duration) -> ProbeResult {
    let config = match addr {
        IpAddr::V4(_) => Config::default(),
        IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
    };

    let client = match Client::new(&config) {
        Ok(client) => client,
        Err(e) => {
            debug!(%addr, error = %e, "cannot open ICMP socket");
            return ProbeResult::failure();
        }
    };

    let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
    pinger.timeout(limit);

    match timeout(limit, pinger.ping(PingSequence(0), &PAYLOAD)).await {
        Ok(Ok((_packet, rtt))) => ProbeResult::success(rtt),
        Ok(Err(SurgeError::Timeout { .. })) | Err(_) => ProbeResult::timeout(),
        Ok(Err(e)) => {
            debug!(%addr, error = %e, "echo request failed");
            ProbeResult::failure()
        }
    }
}
