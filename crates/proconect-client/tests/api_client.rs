//! End-to-end tests for the HTTP layer against a mock backend.

#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test, panics are the assertion mechanism")]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proconect_client::mappers::{map_anuncios_to_frontend, AnuncioEnricher};
use proconect_client::types::models::payloads::{AnuncioQuery, NovaProposta, NovoAnuncio};
use proconect_client::types::{AnuncioStatus, PayloadError, SessionError, Urgencia};
use proconect_client::{friendly_proposal_error, ClientError, LoadingEvent, LoadingStack, RequestOptions};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, logged_in_client, FakeAnuncios};

#[tokio::test]
async fn test_server_error_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    let message = "Você já enviou uma proposta para este serviço.";
    Mock::given(method("POST"))
        .and(path("/api/propostas"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": message })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "tok");
    let payload = NovaProposta { anuncio_id: 7, valor_proposto: Some(250.0), mensagem: None };
    let err = client.create_proposta(&payload).await.expect_err("409 must fail");

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), message);
    assert!(friendly_proposal_error(&err).duplicate);
}

#[tokio::test]
async fn test_plain_text_error_body_and_status_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/anuncios/meus"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_categorias().await.expect_err("502 must fail");
    assert_eq!(err.to_string(), "bad gateway");

    let err = client.list_meus_anuncios().await.expect_err("500 must fail");
    assert_eq!(err.to_string(), "Erro HTTP 500");
}

#[tokio::test]
async fn test_bearer_token_comes_from_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "refresh_token": "ref-456",
            "user": {"id": "u-1", "email": "ana@x.com"},
            "profile": {"id": "u-1", "nome": "Ana", "is_worker": false}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/anuncios/meus"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.login("ana@x.com", "secret").await.expect("login");

    let session = client.session();
    assert_eq!(session.access_token().as_deref(), Some("tok-123"));
    assert_eq!(session.refresh_token().as_deref(), Some("ref-456"));
    assert_eq!(session.current_user().map(|u| u.nome), Some("Ana".to_string()));

    let mine = client.list_meus_anuncios().await.expect("authorized call");
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_unauthorized_wipes_session_and_fires_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token expirado" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "stale");
    client
        .session()
        .login(&proconect_client::types::SessionUser { id: "u-1".to_string(), ..Default::default() })
        .expect("user stored");

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    client.set_on_token_expired(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let err = client.me().await.expect_err("401 must fail");
    assert!(err.is_unauthorized());
    assert_eq!(
        err.to_string(),
        "Token expirado Por favor, reinicie sua sessão fazendo login novamente."
    );
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!client.session().is_authenticated());
    assert!(client.session().refresh_token().is_none());
    assert!(client.session().current_user().is_none());
}

#[tokio::test]
async fn test_network_failures_are_retried() {
    let server = MockServer::start().await;
    // first attempt outlives the 1s per-attempt timeout
    Mock::given(method("GET"))
        .and(path("/api/users/u-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "u-1"}))
                .set_delay(Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u-1", "nome": "Ana"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client.get_user("u-1").await.expect("second attempt succeeds");
    assert_eq!(user.nome.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": "manutenção" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .fetch::<Value>("/api/flaky", RequestOptions::get().retries(3))
        .await
        .expect_err("503 must fail");
    assert_eq!(err.status(), Some(503));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_timeout_without_retries_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_categorias().await.expect_err("must time out");
    assert!(matches!(err, ClientError::Timeout(1)));
}

#[tokio::test]
async fn test_loading_events_are_balanced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categorias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": 1, "nome": "Reformas"}]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/anuncios/meus"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/propostas"))
        .and(query_param("anuncio_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut events = client.loading().subscribe();

    let (categorias, meus) = tokio::join!(client.list_categorias(), client.list_meus_anuncios());
    assert_eq!(categorias.expect("categorias").len(), 1);
    assert!(meus.is_err());
    // no overlay for background counts
    assert_eq!(client.count_propostas(1).await.expect("count"), 0);

    let mut stack = LoadingStack::new();
    let (mut starts, mut ends) = (0, 0);
    while let Ok(event) = events.try_recv() {
        match &event {
            LoadingEvent::Start(_) => starts += 1,
            LoadingEvent::End(_) => ends += 1,
        }
        stack.apply(&event);
    }
    assert_eq!((starts, ends), (2, 2));
    assert!(!stack.is_loading());
}

#[tokio::test]
async fn test_invalid_payload_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/anuncios"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "tok");
    let err = client
        .create_anuncio(&NovoAnuncio::new("", "Pintar a sala", 3))
        .await
        .expect_err("empty title rejected");
    assert!(matches!(err, ClientError::Payload(PayloadError::Invalid { ref field, .. }) if field == "titulo"));
}

#[tokio::test]
async fn test_upload_requires_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/me/foto"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .upload_profile_photo("me.png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .expect_err("no token");
    assert!(matches!(err, ClientError::Session(SessionError::NotAuthenticated)));
}

#[tokio::test]
async fn test_unauthorized_upload_wipes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/me/foto"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token inválido" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "stale");
    client.session().set_tokens(None, Some("refresh")).expect("refresh stored");
    client
        .session()
        .login(&proconect_client::types::SessionUser { id: "u-1".to_string(), ..Default::default() })
        .expect("user stored");

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    client.set_on_token_expired(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let err = client
        .upload_profile_photo("me.png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .expect_err("401 must fail");
    assert!(err.is_unauthorized());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!client.session().is_authenticated());
    assert!(client.session().refresh_token().is_none());
    assert!(client.session().current_user().is_none());
}

#[tokio::test]
async fn test_user_id_is_escaped_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/ana%20maria%2F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ana maria/1", "nome": "Ana" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client.get_user("ana maria/1").await.expect("escaped lookup");
    assert_eq!(user.nome.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_created_listing_shows_up_mapped() {
    let server = MockServer::start().await;
    let backend = FakeAnuncios::default();
    Mock::given(method("POST"))
        .and(path("/api/anuncios"))
        .respond_with(backend.create())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/anuncios/meus"))
        .respond_with(backend.list())
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "tok");
    let mut novo = NovoAnuncio::new("Pintar sala", "Sala de 20m²", 3);
    novo.preco_min = Some(0.0);
    novo.preco_max = Some(400.0);
    let created = client.create_anuncio(&novo).await.expect("created");
    assert_eq!(created.id, 1);

    let mine = client.list_meus_anuncios().await.expect("listed");
    let views = map_anuncios_to_frontend(&mine);
    assert_eq!(views.len(), 1);

    let view = &views[0];
    assert_eq!(view.titulo, "Pintar sala");
    assert_eq!(view.descricao, "Sala de 20m²");
    assert_eq!(view.categoria, "Reformas");
    assert_eq!(view.categoria_id, Some(3));
    assert_eq!(view.localizacao, "Localização não informada");
    assert_eq!(view.preco_min, None);
    assert_eq!(view.preco_max, Some(400.0));
    assert!(view.imagens.is_empty());
    assert!(view.cliente.precisa_buscar);
    assert_eq!(view.cliente.id.as_deref(), Some("u-owner"));
}

#[tokio::test]
async fn test_odd_row_does_not_fail_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/anuncios/meus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [
            {"id": 1, "titulo": "Pintura", "urgencia": "alta"},
            {"id": 2, "titulo": "Jardim", "urgencia": "baixa", "status": "", "requisitos": "luvas"}
        ]})))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "tok");
    let records = client.list_meus_anuncios().await.expect("both rows decode");
    assert_eq!(records.len(), 2);

    let views = map_anuncios_to_frontend(&records);
    assert_eq!(views[0].urgencia, Urgencia::Alta);
    assert_eq!(views[1].urgencia, Urgencia::Normal);
    assert_eq!(views[1].status, AnuncioStatus::Disponivel);
    assert!(views[1].requisitos.is_empty());
}

#[tokio::test]
async fn test_enricher_fills_owner_once() {
    let server = MockServer::start().await;
    let backend = FakeAnuncios::default();
    Mock::given(method("POST"))
        .and(path("/api/anuncios"))
        .respond_with(backend.create())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/anuncios"))
        .respond_with(backend.list())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/u-owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-owner",
            "nome": "Carla",
            "foto_url": "https://cdn.example/carla.png",
            "email_verificado": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, "tok");
    client.create_anuncio(&NovoAnuncio::new("Pintura", "Parede", 3)).await.expect("first");
    client.create_anuncio(&NovoAnuncio::new("Elétrica", "Tomadas", 9)).await.expect("second");

    let listed = client.list_anuncios(&AnuncioQuery::default()).await.expect("listed");
    let mut views = map_anuncios_to_frontend(&listed.into_items());

    let enricher = AnuncioEnricher::new();
    assert_eq!(enricher.enrich(&client, &mut views).await, 2);
    for view in &views {
        assert_eq!(view.cliente.nome, "Carla");
        assert!(view.cliente.verificado);
        assert!(!view.cliente.precisa_buscar);
    }
    assert_eq!(views[1].categoria, "Sem categoria");

    // served from cache, the mock expects a single lookup
    let mut again = map_anuncios_to_frontend(
        &client.list_anuncios(&AnuncioQuery::default()).await.expect("listed").into_items(),
    );
    assert_eq!(enricher.enrich(&client, &mut again).await, 2);
    assert!(enricher.cached("u-owner").is_some());
}
