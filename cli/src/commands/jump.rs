use std::io;
use std::sync::Arc;

use anyhow::{Context, bail};
use jumpr_common::config::{Config, RunMode};
use jumpr_core::discovery::DiscoveryService;
use jumpr_core::launch::SshLauncher;
use jumpr_core::network::dial::Dialer;
use jumpr_core::render::collect_rows;
use jumpr_core::select::{self, SelectionError};
use tracing::info;

use crate::terminal::spinner::Spinner;
use crate::terminal::{logging, redraw, table};

/// Draw the table once, read a row number, and exec ssh to that host.
pub async fn jump(
    cfg: &Config,
    dialer: Arc<dyn Dialer>,
    left: Vec<String>,
    right: Vec<String>,
) -> anyhow::Result<()> {
    let service = DiscoveryService::from_config(cfg, dialer, RunMode::OneShot)
        .context("discovery failed")?;

    let spinner = Spinner::start("Querying inventory...");
    let discovered = service.perform_discovery().await;
    spinner.finish_and_clear();
    let mut snapshot = discovered.context("discovery failed")?;

    if snapshot.is_empty() {
        bail!("no hosts found");
    }

    let rows = collect_rows(&mut snapshot, cfg.address).await;
    let height = table::draw(&mut io::stderr().lock(), &rows)?;

    let index = match select::read_selection(io::stdin().lock(), rows.len()) {
        Ok(index) => index,
        Err(SelectionError::InputClosed) => std::process::exit(1),
        Err(e) => return Err(e).context("invalid selection"),
    };

    let host = &snapshot.hosts[index];

    // The echoed input line sits below the table.
    let mut stderr = io::stderr().lock();
    redraw::erase_lines(&mut stderr, height.0 + 1)?;
    logging::announce(&mut stderr, format_args!("Connecting: {}", host.name()))?;
    drop(stderr);
    info!(id = %host.id, address = %host.preferred_ip(cfg.address), "launching ssh");

    let launcher = SshLauncher::new(cfg.ssh_program.clone())
        .via(cfg.bastion.clone())
        .args(left, right);

    launcher
        .exec(host.preferred_ip(cfg.address))
        .context("failed to launch ssh")?;
    Ok(())
}
