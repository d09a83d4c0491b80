use std::io;
use std::sync::Arc;

use anyhow::Context;
use jumpr_common::config::{Config, RunMode};
use jumpr_core::discovery::DiscoveryService;
use jumpr_core::network::dial::Dialer;
use jumpr_core::render::collect_rows;
use jumpr_core::watch::{self, RefreshLoop};
use tracing::debug;

use crate::terminal::{redraw, table};

/// Keep redrawing the table in place until standard input closes.
pub async fn watch(cfg: &Config, dialer: Arc<dyn Dialer>) -> anyhow::Result<()> {
    let service = DiscoveryService::from_config(cfg, dialer, RunMode::Watch)
        .context("discovery failed")?;
    let service = &service;

    let refresh = RefreshLoop::new(cfg.interval, watch::cancel_on_eof(io::stdin()));

    let cycles = refresh
        .run(|previous| async move {
            let mut snapshot = service
                .perform_discovery()
                .await
                .context("discovery failed")?;
            let rows = collect_rows(&mut snapshot, cfg.address).await;

            let mut stderr = io::stderr().lock();
            if let Some(previous) = previous {
                redraw::erase_lines(&mut stderr, previous.0)?;
            }
            Ok::<_, anyhow::Error>(table::draw(&mut stderr, &rows)?)
        })
        .await?;

    debug!(cycles, "watch finished");
    Ok(())
}
