use std::sync::Arc;
use std::time::Duration;

use jumpr_protocols::http::Endpoint;
use tracing::debug;

use super::http::fetch;
use crate::network::dial::Dialer;

pub const METADATA_TIMEOUT: Duration = Duration::from_secs(2);

/// Asks the instance metadata endpoint who we are.
pub struct MetadataClient {
    dialer: Arc<dyn Dialer>,
    endpoint: Option<Endpoint>,
    timeout: Duration,
}

impl MetadataClient {
    /// An unparsable `url` is logged and makes every lookup return `None`.
    pub fn new(dialer: Arc<dyn Dialer>, url: &str) -> Self {
        let endpoint = Endpoint::parse(url)
            .inspect_err(|e| debug!(error = %e, "metadata endpoint disabled"))
            .ok();
        Self {
            dialer,
            endpoint,
            timeout: METADATA_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The trimmed response body, if the endpoint answered 2xx with
    /// something non-empty.
    pub async fn instance_id(&self) -> Option<String> {
        let endpoint = self.endpoint.as_ref()?;

        let response = match fetch(self.dialer.as_ref(), endpoint, self.timeout).await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "instance metadata unavailable");
                return None;
            }
        };

        if !response.is_success() {
            debug!(status = %response.status, "instance metadata refused");
            return None;
        }

        let id = String::from_utf8_lossy(&response.body).trim().to_string();
        (!id.is_empty()).then_some(id)
    }
}
