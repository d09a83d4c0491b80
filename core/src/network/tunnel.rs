//! Dialing through a bastion.
//!
//! [`dial`] opens exactly one ssh session to the bastion. Every
//! [`Dialer::dial`] on the returned [`TunnelDialer`] then opens a
//! `direct-tcpip` channel multiplexed over that session, so the remote end
//! of each stream is the bastion connecting onward to the requested address.
//!
//! There is no fallback: if the session cannot be established the error is
//! returned and the caller is expected to give up.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use thiserror::Error;
use tracing::{debug, info};

use super::dial::{BoxedStream, Dialer};

mod auth;
mod handler;
mod target;

pub use handler::BastionHandler;
pub use target::{BastionTarget, DEFAULT_SSH_PORT};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("invalid bastion address {0:?}, expected [user@]host[:port]")]
    InvalidTarget(String),

    #[error("connection to bastion failed: {0}")]
    ConnectionFailed(String),

    #[error("timed out connecting to bastion {0}")]
    Timeout(String),

    #[error("host key for {host} is not in known_hosts (fingerprint {fingerprint})")]
    UnknownHostKey { host: String, fingerprint: String },

    #[error("HOST KEY FOR {host} HAS CHANGED (fingerprint {fingerprint})")]
    HostKeyMismatch { host: String, fingerprint: String },

    #[error("could not read known_hosts: {0}")]
    KnownHosts(String),

    #[error("ssh agent error: {0}")]
    Agent(String),

    #[error("authentication to bastion failed: {0}")]
    AuthenticationFailed(String),

    #[error("channel to {target} could not be opened: {reason}")]
    ChannelFailed { target: String, reason: String },

    #[error("ssh protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<russh::Error> for TunnelError {
    fn from(err: russh::Error) -> Self {
        TunnelError::Protocol(err.to_string())
    }
}

/// Something that can open a stream to `host:port` from the far side of an
/// established session.
#[async_trait]
pub trait ChannelOpener: Send + Sync {
    async fn open_channel(&self, host: &str, port: u16) -> Result<BoxedStream, TunnelError>;
}

/// An authenticated ssh session to the bastion.
pub struct BastionSession {
    handle: Handle<BastionHandler>,
    target: BastionTarget,
}

impl BastionSession {
    pub async fn establish(target: BastionTarget) -> Result<Self, TunnelError> {
        info!(host = %target.host, port = target.port, user = %target.user, "connecting to bastion");

        let config = client::Config {
            inactivity_timeout: None,
            keepalive_interval: Some(KEEPALIVE_INTERVAL),
            keepalive_max: 3,
            ..Default::default()
        };
        let handler = BastionHandler::new(target.host.clone(), target.port, target.known_hosts.clone());
        let address = format!("{}:{}", target.host, target.port);

        let mut handle = tokio::time::timeout(
            CONNECT_TIMEOUT,
            client::connect(Arc::new(config), (target.host.as_str(), target.port), handler),
        )
        .await
        .map_err(|_| TunnelError::Timeout(address))?
        .map_err(|e| match e {
            TunnelError::Protocol(reason) => TunnelError::ConnectionFailed(reason),
            other => other,
        })?;

        auth::authenticate(&mut handle, &target).await?;
        info!(host = %target.host, "bastion session established");

        Ok(Self { handle, target })
    }
}

#[async_trait]
impl ChannelOpener for BastionSession {
    async fn open_channel(&self, host: &str, port: u16) -> Result<BoxedStream, TunnelError> {
        let channel = self
            .handle
            .channel_open_direct_tcpip(host, port as u32, "127.0.0.1", 0)
            .await
            .map_err(|e| TunnelError::ChannelFailed {
                target: format!("{host}:{port}"),
                reason: e.to_string(),
            })?;

        debug!(host, port, via = %self.target.host, "opened tunnel channel");
        Ok(Box::new(channel.into_stream()))
    }
}

/// A [`Dialer`] whose connections are channels over one shared session.
pub struct TunnelDialer<O: ChannelOpener = BastionSession> {
    session: Arc<O>,
}

impl<O: ChannelOpener> TunnelDialer<O> {
    pub fn new(session: O) -> Self {
        Self {
            session: Arc::new(session),
        }
    }

    pub fn session(&self) -> &O {
        &self.session
    }
}

impl<O: ChannelOpener> Clone for TunnelDialer<O> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

#[async_trait]
impl<O: ChannelOpener + 'static> Dialer for TunnelDialer<O> {
    async fn dial(&self, host: &str, port: u16) -> io::Result<BoxedStream> {
        self.session
            .open_channel(host, port)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))
    }
}

/// Connects and authenticates to `target` (`[user@]host[:port]`, resolved
/// through `~/.ssh/config`) and returns a dialer over that session.
pub async fn dial(target: &str) -> Result<TunnelDialer, TunnelError> {
    let target = BastionTarget::resolve(target)?;
    let session = BastionSession::establish(target).await?;
    Ok(TunnelDialer::new(session))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
