#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;

use parking_lot::Mutex;
use proconect_client::{ApiClient, Backoff, ClientConfig, RetryConfig};
use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::new(server.uri()).with_timeout_secs(1).with_retry(RetryConfig {
        base_delay_ms: 10,
        max_delay_ms: 50,
        backoff: Backoff::Linear,
    });
    ApiClient::new(config).expect("client builds")
}

pub fn logged_in_client(server: &MockServer, token: &str) -> ApiClient {
    let client = client_for(server);
    client.session().set_tokens(Some(token), Some("refresh")).expect("tokens stored");
    client
}

/// In-memory `anuncios` table: POST inserts, GET lists.
#[derive(Clone, Default)]
pub struct FakeAnuncios {
    rows: Arc<Mutex<Vec<Value>>>,
}

impl FakeAnuncios {
    pub fn create(&self) -> CreateAnuncio {
        CreateAnuncio(self.clone())
    }

    pub fn list(&self) -> ListAnuncios {
        ListAnuncios(self.clone())
    }
}

pub struct CreateAnuncio(FakeAnuncios);

impl Respond for CreateAnuncio {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut row: Value = serde_json::from_slice(&request.body).expect("json body");
        let mut rows = self.0.rows.lock();
        row["id"] = json!(rows.len() + 1);
        row["usuario_id"] = json!("u-owner");
        row["publicado_em"] = json!("2024-06-01T12:00:00+00:00");
        row["categorias"] = match row["categoria_id"].as_i64() {
            Some(3) => json!({"nome": "Reformas", "icone": "hammer"}),
            _ => Value::Null,
        };
        rows.push(row.clone());
        ResponseTemplate::new(201).set_body_json(row)
    }
}

pub struct ListAnuncios(FakeAnuncios);

impl Respond for ListAnuncios {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let rows = self.0.rows.lock().clone();
        ResponseTemplate::new(200).set_body_json(json!({ "items": rows }))
    }
}
