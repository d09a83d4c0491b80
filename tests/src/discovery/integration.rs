use std::sync::Arc;
use std::time::Duration;

use jumpr_common::config::AddressPreference;
use jumpr_common::network::probe::{ProbeOutcome, Protocol};
use jumpr_core::discovery::DiscoveryService;
use jumpr_core::inventory::{HttpInventory, MetadataClient};
use jumpr_core::network::dial::{Dialer, DirectDialer};
use jumpr_core::probe::ProbeEngine;
use jumpr_core::render::collect_rows;
use jumpr_protocols::http::Endpoint;
use tokio::net::TcpListener;

use crate::support::{document, record, routes, serve};

const METADATA_PATH: &str = "/latest/meta-data/instance-id";

fn service(port: u16, engine: ProbeEngine, filter: bool) -> DiscoveryService {
    let dialer: Arc<dyn Dialer> = Arc::new(DirectDialer::default());
    let endpoint = Endpoint::parse(&format!("http://127.0.0.1:{port}/hosts")).unwrap();
    let metadata = MetadataClient::new(
        Arc::clone(&dialer),
        &format!("http://127.0.0.1:{port}{METADATA_PATH}"),
    );
    DiscoveryService::new(
        Box::new(HttpInventory::new(dialer, endpoint, metadata)),
        engine,
        filter,
    )
}

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Full cycle against a loopback inventory: incomplete records are dropped,
/// rows come back sorted by name, and every probe resolves.
#[tokio::test]
async fn discovery_over_loopback_inventory() {
    let ssh = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ssh_port = ssh.local_addr().unwrap().port();
    let closed = closed_port().await;

    let inventory = document(&[
        record("i-0web", "web", "vpc-a", Some("127.0.0.1")),
        record("i-0api", "api", "vpc-a", None),
        record("i-0db", "db", "vpc-a", Some("127.0.0.1")),
    ]);
    let port = serve(routes(&[("/hosts", inventory)])).await;

    let engine = ProbeEngine::new(Duration::from_secs(2))
        .with_port(Protocol::Ssh, ssh_port)
        .with_port(Protocol::Http, closed)
        .with_port(Protocol::Https, closed);

    let mut snapshot = service(port, engine, false).perform_discovery().await.unwrap();
    let rows = collect_rows(&mut snapshot, AddressPreference::Private).await;

    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["db", "web"]);
    assert_eq!(rows[0].short_id, "0db");
    assert_eq!(rows[1].number, 2);

    for row in &rows {
        assert_eq!(row.probes[Protocol::Ssh.index()].outcome, ProbeOutcome::Success);
        assert_eq!(row.probes[Protocol::Http.index()].outcome, ProbeOutcome::Failure);
        assert_eq!(row.probes[Protocol::Https.index()].outcome, ProbeOutcome::Failure);
        assert_ne!(row.probes[Protocol::Icmp.index()].outcome, ProbeOutcome::Unknown);
    }
}

#[tokio::test]
async fn vantage_segment_narrows_the_list() -> anyhow::Result<()> {
    let inventory = document(&[
        record("i-bastion", "bastion", "vpc-a", Some("127.0.0.1")),
        record("i-1", "alpha", "vpc-a", Some("127.0.0.1")),
        record("i-2", "beta", "vpc-b", Some("127.0.0.1")),
    ]);
    let port = serve(routes(&[
        ("/hosts", inventory),
        (METADATA_PATH, "i-bastion\n".to_string()),
    ]))
    .await;

    let engine = ProbeEngine::new(Duration::from_millis(200));

    let filtered = service(port, engine.clone(), true).perform_discovery().await?;
    let ids: Vec<&str> = filtered.hosts.iter().map(|host| host.id.as_str()).collect();
    assert_eq!(ids, ["i-1", "i-bastion"]);
    assert_eq!(filtered.bastion_segment.as_deref(), Some("vpc-a"));

    let unfiltered = service(port, engine, false).perform_discovery().await?;
    assert_eq!(unfiltered.len(), 3);
    Ok(())
}

#[tokio::test]
async fn failing_inventory_is_an_error() {
    let port = serve(routes(&[])).await;
    let engine = ProbeEngine::new(Duration::from_millis(200));

    let result = service(port, engine, false).perform_discovery().await;

    assert!(result.is_err(), "a 404 inventory must fail discovery");
}
