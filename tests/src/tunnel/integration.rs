use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jumpr_common::config::AddressPreference;
use jumpr_core::discovery::DiscoveryService;
use jumpr_core::inventory::{HttpInventory, MetadataClient};
use jumpr_core::network::dial::{BoxedStream, Dialer};
use jumpr_core::network::tunnel::{ChannelOpener, TunnelDialer, TunnelError};
use jumpr_core::probe::ProbeEngine;
use jumpr_core::render::collect_rows;
use jumpr_protocols::http::Endpoint;

use crate::support::{Routes, answer, document, record, routes};

/// Stands in for an ssh session to a bastion. Every channel is an in-memory
/// pipe answered from `routes`, whatever the requested destination.
struct FakeBastion {
    routes: Routes,
    channels: Mutex<Vec<(String, u16)>>,
}

impl FakeBastion {
    fn connect(routes: Routes) -> Self {
        Self {
            routes,
            channels: Mutex::new(Vec::new()),
        }
    }

    fn channels(&self) -> Vec<(String, u16)> {
        self.channels.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelOpener for FakeBastion {
    async fn open_channel(&self, host: &str, port: u16) -> Result<BoxedStream, TunnelError> {
        self.channels.lock().unwrap().push((host.to_string(), port));

        let (near, far) = tokio::io::duplex(8 * 1024);
        let routes = Arc::clone(&self.routes);
        tokio::spawn(async move { answer(far, &routes).await });
        Ok(Box::new(near))
    }
}

/// Inventory and metadata both travel as channels over the one session, and
/// the clone handed to the inventory shares it. Probes never open a channel.
#[tokio::test]
async fn inventory_queries_share_one_bastion_session() {
    let inventory = document(&[
        record("i-bastion", "bastion", "vpc-a", Some("127.0.0.1")),
        record("i-1", "alpha", "vpc-a", Some("127.0.0.1")),
        record("i-2", "beta", "vpc-b", Some("127.0.0.1")),
    ]);
    let bastion = FakeBastion::connect(routes(&[
        ("/hosts", inventory),
        ("/latest/meta-data/instance-id", "i-bastion".to_string()),
    ]));

    let tunnel = TunnelDialer::new(bastion);
    let dialer: Arc<dyn Dialer> = Arc::new(tunnel.clone());

    let endpoint = Endpoint::parse("http://10.0.0.5:8773/hosts").unwrap();
    let metadata = MetadataClient::new(
        Arc::clone(&dialer),
        "http://169.254.169.254/latest/meta-data/instance-id",
    );
    let service = DiscoveryService::new(
        Box::new(HttpInventory::new(dialer, endpoint, metadata)),
        ProbeEngine::new(Duration::from_millis(200)),
        true,
    );

    let mut first = service.perform_discovery().await.unwrap();
    let second = service.perform_discovery().await.unwrap();
    collect_rows(&mut first, AddressPreference::Private).await;

    let ids: Vec<&str> = first.hosts.iter().map(|host| host.id.as_str()).collect();
    assert_eq!(ids, ["i-1", "i-bastion"]);
    assert_eq!(second.len(), 2);

    assert_eq!(
        tunnel.session().channels(),
        [
            ("10.0.0.5".to_string(), 8773),
            ("169.254.169.254".to_string(), 80),
            ("10.0.0.5".to_string(), 8773),
        ]
    );
}

#[tokio::test]
async fn unknown_path_through_the_tunnel_fails_discovery() {
    let bastion = FakeBastion::connect(routes(&[]));
    let dialer: Arc<dyn Dialer> = Arc::new(TunnelDialer::new(bastion));

    let endpoint = Endpoint::parse("http://10.0.0.5:8773/hosts").unwrap();
    let metadata = MetadataClient::new(Arc::clone(&dialer), "http://169.254.169.254/");
    let service = DiscoveryService::new(
        Box::new(HttpInventory::new(dialer, endpoint, metadata)),
        ProbeEngine::new(Duration::from_millis(200)),
        false,
    );

    assert!(service.perform_discovery().await.is_err());
}
