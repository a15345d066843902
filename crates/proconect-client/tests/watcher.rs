//! Proposal watcher polling a mock backend.

#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test, panics are the assertion mechanism")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use proconect_client::storage::keys;
use proconect_client::{
    ApiClient, ClientConfig, NotificationCenter, NotificationKind, ProposalCounts, ProposalWatcher,
    WatcherConfig,
};
use serde_json::{json, Value};
use tokio::sync::watch;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::logged_in_client;

fn propostas(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| json!({"id": i + 1, "anuncio_id": 7, "usuario_id_worker": format!("p-{i}")}))
        .collect();
    json!({ "items": items })
}

async fn mount_listings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/anuncios/meus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [
            {"id": 7, "titulo": "Pintura", "usuario_id": "u-me"},
            {"id": 8, "titulo": "Elétrica", "usuario_id": "u-me"}
        ]})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_growth_from_nonzero_raises_one_sticky_alert() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(propostas(1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(propostas(3)))
        .mount(&server)
        .await;

    let client = Arc::new(logged_in_client(&server, "tok"));
    let notifications = NotificationCenter::new();
    let watcher = ProposalWatcher::new(Arc::clone(&client), notifications.clone(), WatcherConfig::default());

    // first sighting only records the baseline
    let first = watcher.poll_once().await.expect("first poll");
    assert!(first.alerts.is_empty());
    assert_eq!(first.anuncios.iter().map(|a| a.propostas).collect::<Vec<_>>(), vec![1, 0]);
    assert!(notifications.is_empty());

    let second = watcher.poll_once().await.expect("second poll");
    assert_eq!(second.alerts.len(), 1);
    assert_eq!(second.alerts[0].novas, 2);

    let shown = notifications.list();
    assert_eq!(shown.len(), 1);
    let alert = &shown[0];
    assert_eq!(alert.kind, NotificationKind::Info);
    assert_eq!(alert.title.as_deref(), Some("Nova proposta recebida!"));
    assert_eq!(alert.category.as_deref(), Some("proposal"));
    assert_eq!(alert.message, "Você recebeu 2 novas propostas para \"Pintura\"");
    assert!(alert.is_sticky());
    assert_eq!(alert.meta.as_ref().map(|m| m["anuncio_id"].clone()), Some(json!(7)));

    let third = watcher.poll_once().await.expect("third poll");
    assert!(third.alerts.is_empty());
    assert_eq!(notifications.len(), 1);

    let stored = client.session().state().get(&keys::PROPOSTAS_CONTADAS).expect("snapshot");
    assert_eq!(stored, ProposalCounts::from([(7, 3), (8, 0)]));
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(propostas(4)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    {
        let config = ClientConfig::new(server.uri()).with_data_dir(dir.path());
        let client = ApiClient::new(config).expect("client");
        client.session().set_tokens(Some("tok"), None).expect("tokens");
        client
            .session()
            .state()
            .set(&keys::PROPOSTAS_CONTADAS, &ProposalCounts::from([(7, 1)]))
            .expect("seed");
    }

    let config = ClientConfig::new(server.uri()).with_data_dir(dir.path());
    let client = Arc::new(ApiClient::new(config).expect("reopened"));
    assert!(client.session().is_authenticated());

    let notifications = NotificationCenter::new();
    let watcher = ProposalWatcher::new(client, notifications.clone(), WatcherConfig::default());
    let outcome = watcher.poll_once().await.expect("poll");

    assert_eq!(outcome.alerts.len(), 1);
    assert_eq!(outcome.alerts[0].novas, 3);
    assert_eq!(notifications.len(), 1);
}

#[tokio::test]
async fn test_failed_count_keeps_previous_value() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "7"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "indisponível" })))
        .mount(&server)
        .await;

    let client = Arc::new(logged_in_client(&server, "tok"));
    client
        .session()
        .state()
        .set(&keys::PROPOSTAS_CONTADAS, &ProposalCounts::from([(7, 2)]))
        .expect("seed");

    let notifications = NotificationCenter::new();
    let watcher = ProposalWatcher::new(Arc::clone(&client), notifications.clone(), WatcherConfig::default());
    let outcome = watcher.poll_once().await.expect("poll");

    assert!(outcome.alerts.is_empty());
    assert_eq!(outcome.anuncios[0].propostas, 2);
    assert!(notifications.is_empty());
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(propostas(0)))
        .mount(&server)
        .await;

    let client = Arc::new(logged_in_client(&server, "tok"));
    let watcher = ProposalWatcher::new(
        client,
        NotificationCenter::new(),
        WatcherConfig { interval: Duration::from_millis(50) },
    );

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move { watcher.run(rx).await });
    tokio::time::sleep(Duration::from_millis(120)).await;
    tx.send(true).expect("watcher alive");

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("watcher stopped")
        .expect("task joined");
    assert!(!server.received_requests().await.expect("recording on").is_empty());
}
