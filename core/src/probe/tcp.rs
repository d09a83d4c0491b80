use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use jumpr_common::network::probe::ProbeResult;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};
use tracing::debug;

/// Reachability over TCP: a completed connect is success, the socket is
/// dropped straight away without speaking the protocol.
pub async fn connect_probe(target: SocketAddr, limit: Duration) -> ProbeResult {
    timed_connect(target, limit, TcpStream::connect(target)).await
}

async fn timed_connect<S>(
    target: SocketAddr,
    limit: Duration,
    connect: impl Future<Output = io::Result<S>>,
) -> ProbeResult {
    let started = Instant::now();

    match timeout(limit, connect).await {
        Ok(Ok(stream)) => {
            let latency = started.elapsed();
            drop(stream);
            ProbeResult::success(latency)
        }
        Ok(Err(e)) => {
            debug!(%target, error = %e, "connect failed");
            ProbeResult::failure()
        }
        Err(_elapsed) => ProbeResult::timeout(),
    }
}
