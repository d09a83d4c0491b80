use std::path::PathBuf;

use russh::client;
use russh::keys::ssh_key::HashAlg;
use russh::keys::PublicKey;
use tracing::{debug, warn};

use super::TunnelError;

/// Client-side session handler. Only accepts a bastion whose host key is
/// already recorded in `known_hosts`.
pub struct BastionHandler {
    host: String,
    port: u16,
    known_hosts: PathBuf,
}

impl BastionHandler {
    pub fn new(host: impl Into<String>, port: u16, known_hosts: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            known_hosts: known_hosts.into(),
        }
    }
}

impl client::Handler for BastionHandler {
    type Error = TunnelError;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint(HashAlg::Sha256).to_string();

        match russh::keys::check_known_hosts_path(
            &self.host,
            self.port,
            server_public_key,
            &self.known_hosts,
        ) {
            Ok(true) => {
                debug!(host = %self.host, port = self.port, "bastion host key verified");
                Ok(true)
            }
            Ok(false) => Err(TunnelError::UnknownHostKey {
                host: self.host.clone(),
                fingerprint,
            }),
            Err(russh::keys::Error::KeyChanged { line }) => {
                warn!(host = %self.host, line, "bastion host key does not match known_hosts");
                Err(TunnelError::HostKeyMismatch {
                    host: self.host.clone(),
                    fingerprint,
                })
            }
            Err(e) => Err(TunnelError::KnownHosts(e.to_string())),
        }
    }
}
