//! Where the host list comes from.
//!
//! An [`Inventory`] answers two questions: which hosts exist, and which of
//! them (if any) is the machine asking. Both go over the configured
//! [`Dialer`], so with a bastion configured they are answered from the
//! bastion's point of view.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jumpr_common::config::Config;
use jumpr_common::network::record::RawRecord;
use jumpr_protocols::http::{Endpoint, HttpError};
use thiserror::Error;

use crate::network::dial::Dialer;

mod file;
mod http;
mod metadata;

pub use file::FileInventory;
pub use http::HttpInventory;
pub use metadata::MetadataClient;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("inventory query timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("inventory answered with HTTP status {0}")]
    Status(u16),

    #[error("could not decode inventory: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not read {path}: {source}")]
    File { path: PathBuf, source: io::Error },
}

#[async_trait]
pub trait Inventory: Send + Sync {
    /// Every host the inventory knows about, unfiltered.
    async fn describe_hosts(&self) -> Result<Vec<RawRecord>, InventoryError>;

    /// Instance id of the querying machine. `None` when it cannot be
    /// determined, which is the normal case off-cloud.
    async fn vantage_id(&self) -> Option<String>;
}

/// Picks the inventory source named by `cfg.inventory`: an `http://` URL is
/// queried through `dialer`, anything else is read as a JSON file.
pub fn from_config(
    cfg: &Config,
    dialer: Arc<dyn Dialer>,
) -> Result<Box<dyn Inventory>, InventoryError> {
    let metadata = MetadataClient::new(Arc::clone(&dialer), &cfg.metadata_url);

    if cfg.inventory.contains("://") {
        let endpoint = Endpoint::parse(&cfg.inventory)?;
        Ok(Box::new(HttpInventory::new(dialer, endpoint, metadata)))
    } else {
        Ok(Box::new(FileInventory::new(&cfg.inventory, metadata)))
    }
}

/// The inventory document is a JSON array of records.
pub(crate) fn decode_records(raw: &[u8]) -> Result<Vec<RawRecord>, InventoryError> {
    Ok(serde_json::from_slice(raw)?)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
