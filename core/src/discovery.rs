//! One discovery cycle: query the inventory, work out which segment we are
//! looking from, and build a [`Snapshot`] with its probes in flight.

use std::sync::Arc;

use jumpr_common::config::{Config, RunMode};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::inventory::{self, Inventory, InventoryError};
use crate::network::dial::Dialer;
use crate::probe::ProbeEngine;
use crate::snapshot::{Snapshot, SnapshotBuilder};

pub struct DiscoveryService {
    inventory: Box<dyn Inventory>,
    engine: ProbeEngine,
    filter_by_segment: bool,
    /// The vantage never moves during a run, so it is asked for only once.
    vantage: OnceCell<Option<String>>,
}

impl DiscoveryService {
    pub fn new(inventory: Box<dyn Inventory>, engine: ProbeEngine, filter_by_segment: bool) -> Self {
        Self {
            inventory,
            engine,
            filter_by_segment,
            vantage: OnceCell::new(),
        }
    }

    pub fn from_config(
        cfg: &Config,
        dialer: Arc<dyn Dialer>,
        mode: RunMode,
    ) -> Result<Self, InventoryError> {
        Ok(Self::new(
            inventory::from_config(cfg, dialer)?,
            ProbeEngine::from_config(cfg),
            cfg.segment_filter.applies(mode),
        ))
    }

    pub async fn perform_discovery(&self) -> Result<Snapshot, InventoryError> {
        let records = self.inventory.describe_hosts().await?;
        info!(records = records.len(), "inventory query complete");

        let bastion = if self.filter_by_segment {
            self.vantage().await
        } else {
            None
        };

        Ok(SnapshotBuilder::new(&self.engine)
            .bastion(bastion)
            .build(records))
    }

    async fn vantage(&self) -> Option<String> {
        self.vantage
            .get_or_init(|| async {
                let id = self.inventory.vantage_id().await;
                debug!(vantage = ?id, "resolved vantage instance");
                id
            })
            .await
            .clone()
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
