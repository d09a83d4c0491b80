use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jumpr_common::network::record::RawRecord;
use jumpr_protocols::http::{self as wire, Endpoint, Response};
use tracing::{debug, info};

use super::{Inventory, InventoryError, MetadataClient, decode_records};
use crate::network::dial::Dialer;

pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues one GET over `dialer` and returns the decoded response, whatever
/// its status. The whole exchange is bounded by `limit`.
pub(crate) async fn fetch(
    dialer: &dyn Dialer,
    endpoint: &Endpoint,
    limit: Duration,
) -> Result<Response, InventoryError> {
    let exchange = async {
        let stream = dialer.dial(endpoint.host(), endpoint.port()).await?;
        Ok::<_, InventoryError>(wire::get(stream, endpoint).await?)
    };

    tokio::time::timeout(limit, exchange)
        .await
        .map_err(|_| InventoryError::Timeout(limit))?
}

pub struct HttpInventory {
    dialer: Arc<dyn Dialer>,
    endpoint: Endpoint,
    metadata: MetadataClient,
    timeout: Duration,
}

impl HttpInventory {
    pub fn new(dialer: Arc<dyn Dialer>, endpoint: Endpoint, metadata: MetadataClient) -> Self {
        Self {
            dialer,
            endpoint,
            metadata,
            timeout: QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Inventory for HttpInventory {
    async fn describe_hosts(&self) -> Result<Vec<RawRecord>, InventoryError> {
        info!(endpoint = %self.endpoint, "querying inventory");

        let response = fetch(self.dialer.as_ref(), &self.endpoint, self.timeout).await?;
        if !response.is_success() {
            return Err(InventoryError::Status(response.status.as_u16()));
        }

        let records = decode_records(&response.body)?;
        debug!(records = records.len(), "inventory answered");
        Ok(records)
    }

    async fn vantage_id(&self) -> Option<String> {
        self.metadata.instance_id().await
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
