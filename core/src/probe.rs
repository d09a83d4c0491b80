//! The **probe engine**.
//!
//! [`ProbeEngine::probe`] returns immediately with a [`ProbeHandle`] and runs
//! the actual check on its own tokio task. Every task resolves its handle
//! exactly once, and every failure path (refused, unreachable, timed out, no
//! ICMP socket) is folded into a [`ProbeResult`]: a single dead host never
//! turns into an error for the rest of the fleet.
//!
//! Probes always connect directly. The [`crate::network::dial::Dialer`] used
//! for the inventory query is never consulted here.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use jumpr_common::config::Config;
use jumpr_common::network::probe::{ProbeResult, Protocol};
use tokio::sync::{Semaphore, oneshot};
use tracing::debug;

mod icmp;
mod tcp;

/// Single-value result slot written by a probe task and read once by the
/// renderer.
#[derive(Debug)]
pub struct ProbeHandle {
    rx: Option<oneshot::Receiver<ProbeResult>>,
}

impl ProbeHandle {
    fn pending(rx: oneshot::Receiver<ProbeResult>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A handle whose result is already available.
    pub fn resolved(result: ProbeResult) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self::pending(rx)
    }

    /// Waits for the result. Returns `None` once the result has been taken.
    ///
    /// A probe task that died without answering reads as an unknown outcome.
    pub async fn take(&mut self) -> Option<ProbeResult> {
        let rx = self.rx.take()?;
        Some(rx.await.unwrap_or_default())
    }

    pub fn is_exhausted(&self) -> bool {
        self.rx.is_none()
    }
}

/// One handle per protocol, in [`Protocol::ALL`] order.
#[derive(Debug)]
pub struct ProbeSet {
    handles: [ProbeHandle; 4],
}

impl ProbeSet {
    pub fn new(handles: [ProbeHandle; 4]) -> Self {
        Self { handles }
    }

    pub fn get_mut(&mut self, protocol: Protocol) -> &mut ProbeHandle {
        &mut self.handles[protocol.index()]
    }

    /// Waits for all four results in column order. Exhausted handles read as
    /// unknown.
    pub async fn take_all(&mut self) -> [ProbeResult; 4] {
        let mut results = [ProbeResult::unknown(); 4];
        for (slot, handle) in results.iter_mut().zip(self.handles.iter_mut()) {
            *slot = handle.take().await.unwrap_or_default();
        }
        results
    }
}

/// Per-protocol TCP ports. Only tests move these off the well-known values.
#[derive(Debug, Clone, Copy)]
struct PortMap([Option<u16>; 4]);

impl Default for PortMap {
    fn default() -> Self {
        Self(Protocol::ALL.map(Protocol::default_port))
    }
}

#[derive(Debug, Clone)]
pub struct ProbeEngine {
    timeout: Duration,
    ports: PortMap,
    limit: Option<Arc<Semaphore>>,
}

impl ProbeEngine {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ports: PortMap::default(),
            limit: None,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let engine = Self::new(cfg.probe_timeout);
        match cfg.max_probes {
            Some(max) => engine.with_limit(max),
            None => engine,
        }
    }

    /// Overrides the port checked for a TCP protocol. Ignored for ICMP.
    pub fn with_port(mut self, protocol: Protocol, port: u16) -> Self {
        if protocol != Protocol::Icmp {
            self.ports.0[protocol.index()] = Some(port);
        }
        self
    }

    /// Caps the number of probes in flight at once. The timeout of a queued
    /// probe starts when it gets a permit.
    pub fn with_limit(mut self, max: usize) -> Self {
        self.limit = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    /// Starts one probe and returns without waiting for it. Must be called
    /// from within a tokio runtime.
    pub fn probe(&self, addr: IpAddr, protocol: Protocol) -> ProbeHandle {
        let (tx, rx) = oneshot::channel();
        let limit = self.limit.clone();
        let timeout = self.timeout;
        let port = self.ports.0[protocol.index()];

        tokio::spawn(async move {
            let _permit = match limit {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            let result = match port {
                Some(port) => tcp::connect_probe(SocketAddr::new(addr, port), timeout).await,
                None => icmp::echo_probe(addr, timeout).await,
            };

            debug!(%addr, %protocol, outcome = ?result.outcome, "probe finished");
            let _ = tx.send(result);
        });

        ProbeHandle::pending(rx)
    }

    /// Starts all four probes against `addr`.
    pub fn probe_all(&self, addr: IpAddr) -> ProbeSet {
        ProbeSet::new(Protocol::ALL.map(|protocol| self.probe(addr, protocol)))
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
