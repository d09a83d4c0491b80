//! Public-key authentication against the bastion: keys held by the ssh agent
//! first, then key files on disk.

use std::path::PathBuf;
use std::sync::Arc;

use russh::client::Handle;
use russh::keys::key::PrivateKeyWithHashAlg;
use tracing::{debug, warn};

use super::handler::BastionHandler;
use super::target::BastionTarget;
use super::TunnelError;

const DEFAULT_KEYS: [&str; 3] = ["id_ed25519", "id_ecdsa", "id_rsa"];

pub async fn authenticate(
    handle: &mut Handle<BastionHandler>,
    target: &BastionTarget,
) -> Result<(), TunnelError> {
    #[cfg(unix)]
    match agent::authenticate(handle, &target.user).await {
        Ok(true) => return Ok(()),
        Ok(false) => debug!("no agent key was accepted by the bastion"),
        Err(e) => debug!(error = %e, "ssh agent unavailable"),
    }

    for path in key_candidates(target) {
        if !path.is_file() {
            continue;
        }

        let key = match russh::keys::load_secret_key(&path, None) {
            Ok(key) => key,
            Err(e) => {
                // Encrypted keys land here; there is no prompt to ask for a passphrase.
                debug!(path = %path.display(), error = %e, "skipping key");
                continue;
            }
        };

        let result = handle
            .authenticate_publickey(&target.user, PrivateKeyWithHashAlg::new(Arc::new(key), None))
            .await?;

        if result.success() {
            debug!(path = %path.display(), "authenticated to bastion with key file");
            return Ok(());
        }
    }

    Err(TunnelError::AuthenticationFailed(format!(
        "no key was accepted for {}@{}",
        target.user, target.host
    )))
}

/// Configured identity files followed by the usual default key names.
fn key_candidates(target: &BastionTarget) -> Vec<PathBuf> {
    let defaults = dirs::home_dir()
        .map(|home| home.join(".ssh"))
        .into_iter()
        .flat_map(|dir| DEFAULT_KEYS.map(|name| dir.join(name)));

    let mut candidates: Vec<PathBuf> = target.identity_files.clone();
    for path in defaults {
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }
    candidates
}

#[cfg(unix)]
mod agent {
    use std::future::Future;

    use russh::client::Handle;
    use russh::keys::agent::client::{AgentClient, AgentStream};
    use russh::keys::ssh_key;
    use russh::{AgentAuthError, CryptoVec, Signer};

    use super::*;

    type DynAgent = AgentClient<Box<dyn AgentStream + Send + Unpin + 'static>>;

    /// Owns the public key before the signing future is built, which keeps the
    /// future `Send`.
    struct AgentSigner<'a> {
        agent: &'a mut DynAgent,
    }

    impl Signer for AgentSigner<'_> {
        type Error = AgentAuthError;

        fn auth_publickey_sign(
            &mut self,
            key: &ssh_key::PublicKey,
            hash_alg: Option<ssh_key::HashAlg>,
            to_sign: CryptoVec,
        ) -> impl Future<Output = Result<CryptoVec, Self::Error>> + Send {
            let key = key.clone();
            async move {
                self.agent
                    .sign_request(&key, hash_alg, to_sign)
                    .await
                    .map_err(Into::into)
            }
        }
    }

    /// Tries every identity the agent holds. `Ok(false)` means the agent was
    /// reachable but the bastion accepted none of them.
    pub async fn authenticate(
        handle: &mut Handle<BastionHandler>,
        user: &str,
    ) -> Result<bool, TunnelError> {
        let mut agent: DynAgent = AgentClient::connect_env()
            .await
            .map_err(|e| TunnelError::Agent(e.to_string()))?
            .dynamic();

        let keys = agent
            .request_identities()
            .await
            .map_err(|e| TunnelError::Agent(e.to_string()))?;

        for key in keys {
            let comment = key.comment().to_string();
            let outcome = handle
                .authenticate_publickey_with(user, key, None, &mut AgentSigner { agent: &mut agent })
                .await;

            match outcome {
                Ok(result) if result.success() => {
                    debug!(key = %comment, "authenticated to bastion with agent key");
                    return Ok(true);
                }
                Ok(_) => debug!(key = %comment, "agent key rejected"),
                Err(e) => warn!(key = %comment, error = %e, "agent failed to sign"),
            }
        }

        Ok(false)
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
