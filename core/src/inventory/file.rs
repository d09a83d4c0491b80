use std::path::PathBuf;

use async_trait::async_trait;
use jumpr_common::network::record::RawRecord;
use tracing::debug;

use super::{Inventory, InventoryError, MetadataClient, decode_records};

/// An inventory exported to a JSON file. Re-read on every query so watch
/// mode picks up changes.
pub struct FileInventory {
    path: PathBuf,
    metadata: MetadataClient,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>, metadata: MetadataClient) -> Self {
        Self {
            path: path.into(),
            metadata,
        }
    }
}

#[async_trait]
impl Inventory for FileInventory {
    async fn describe_hosts(&self) -> Result<Vec<RawRecord>, InventoryError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| InventoryError::File {
                path: self.path.clone(),
                source,
            })?;

        let records = decode_records(&raw)?;
        debug!(path = %self.path.display(), records = records.len(), "read inventory file");
        Ok(records)
    }

    async fn vantage_id(&self) -> Option<String> {
        self.metadata.instance_id().await
    }
}
