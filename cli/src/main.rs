mod commands;
mod terminal;

use std::sync::Arc;

use anyhow::Context;
use commands::{CommandLine, Mode, jump, watch};
use jumpr_common::config::Config;
use jumpr_core::network::dial::{Dialer, DirectDialer};
use jumpr_core::network::tunnel;
use terminal::logging;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init_logging();

    let cfg = Config::from_env().context("invalid configuration")?;

    if cfg.agent_socket.is_none() {
        warn!("agent forwarding not enabled, SSH_AUTH_SOCK is not set");
    }

    let dialer: Arc<dyn Dialer> = match &cfg.bastion {
        Some(bastion) => Arc::new(
            tunnel::dial(bastion)
                .await
                .context("discovery failed")?,
        ),
        None => Arc::new(DirectDialer::default()),
    };

    match commands.into_mode() {
        Mode::Watch => watch::watch(&cfg, dialer).await,
        Mode::Jump { left, right } => jump::jump(&cfg, dialer, left, right).await,
    }
}
