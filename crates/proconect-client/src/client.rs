use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use proconect_types::SessionError;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::loading::{LoadingBus, LoadingDescriptor};
use crate::session::SessionStore;
use crate::storage::PersistedState;

const GET_TITLE: &str = "sincronizando";
const GET_MESSAGE: &str = "Carregando as informações mais recentes para você.";
const WRITE_TITLE: &str = "processando";
const WRITE_MESSAGE: &str = "Estamos validando seus dados com segurança. Quase lá!";

/// Called after a rejected token has wiped the session.
pub type TokenExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Per-call options for [`ApiClient::fetch`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    body: Option<Value>,
    headers: Vec<(String, String)>,
    show_loading: bool,
    loading_title: Option<String>,
    loading_message: Option<String>,
    loading_context: Option<String>,
    retries: u32,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
            show_loading: true,
            loading_title: None,
            loading_message: None,
            loading_context: None,
            retries: 0,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Retry network failures up to `retries` extra times.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn without_loading(mut self) -> Self {
        self.show_loading = false;
        self
    }

    pub fn loading_title(mut self, title: impl Into<String>) -> Self {
        self.loading_title = Some(title.into());
        self
    }

    pub fn loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = Some(message.into());
        self
    }

    pub fn loading_context(mut self, context: impl Into<String>) -> Self {
        self.loading_context = Some(context.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn descriptor(&self) -> LoadingDescriptor {
        let (title, message) = if self.method == Method::GET {
            (GET_TITLE, GET_MESSAGE)
        } else {
            (WRITE_TITLE, WRITE_MESSAGE)
        };
        LoadingDescriptor {
            id: None,
            title: Some(self.loading_title.clone().unwrap_or_else(|| title.to_string())),
            message: Some(self.loading_message.clone().unwrap_or_else(|| message.to_string())),
            context: self.loading_context.clone(),
        }
    }
}

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) if text.trim().is_empty() => Value::Null,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// HTTP client for the ProConect backend.
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    session: SessionStore,
    loading: LoadingBus,
    on_token_expired: RwLock<Option<TokenExpiredHook>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.session.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client; state lives in `config.data_dir` when set.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let state = match &config.data_dir {
            Some(dir) => PersistedState::open_in(dir)?,
            None => PersistedState::in_memory(),
        };
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            config,
            session: SessionStore::new(Arc::new(state)),
            loading: LoadingBus::new(),
            on_token_expired: RwLock::new(None),
        })
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = session;
        self
    }

    pub fn with_loading_bus(mut self, loading: LoadingBus) -> Self {
        self.loading = loading;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn loading(&self) -> &LoadingBus {
        &self.loading
    }

    pub fn set_on_token_expired<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_token_expired.write() = Some(Arc::new(hook));
    }

    pub fn clear_on_token_expired(&self) {
        *self.on_token_expired.write() = None;
    }

    /// Request `path` and decode the body as `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let body = self.fetch_body(path, options).await?;
        decode(path, body.into_value())
    }

    /// Request `path` and return the raw body.
    pub async fn fetch_body(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ClientError> {
        let _loading = options.show_loading.then(|| self.loading.guard(options.descriptor()));

        let mut attempt = 0;
        loop {
            match self.fetch_once(path, &options).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_network() && attempt < options.retries => {
                    let delay = self.config.retry.delay_for(attempt);
                    warn!(
                        "{} {} failed ({}), retrying in {:?} (attempt {}/{})",
                        options.method,
                        path,
                        e,
                        delay,
                        attempt + 1,
                        options.retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ResponseBody, ClientError> {
        debug!("{} {}", options.method, path);
        let mut request = self.http.request(options.method.clone(), self.url(path));
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !options.has_header(AUTHORIZATION.as_str()) {
            if let Some(token) = self.session.access_token() {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = &options.body {
            if !options.has_header(CONTENT_TYPE.as_str()) {
                request = request.header(CONTENT_TYPE, "application/json");
            }
            request = request.body(serde_json::to_vec(body)?);
        }
        self.execute(request).await
    }

    /// POST a multipart form; requires a logged-in session.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let token = self.session.access_token().ok_or(SessionError::NotAuthenticated)?;
        debug!("POST {} (multipart)", path);
        let request = self.http.post(self.url(path)).bearer_auth(token).multipart(form);
        let body = self.execute(request).await?;
        decode(path, body.into_value())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<ResponseBody, ClientError> {
        let timeout = self.config.timeout();
        tokio::time::timeout(timeout, async {
            let response = request.send().await?;
            let status = response.status();
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("application/json"));
            let text = response.text().await?;

            let body = if is_json && !text.trim().is_empty() {
                match serde_json::from_str::<Value>(&text) {
                    Ok(value) => ResponseBody::Json(value),
                    Err(_) if !status.is_success() => ResponseBody::Text(text),
                    Err(e) => return Err(ClientError::Json(e)),
                }
            } else {
                ResponseBody::Text(text)
            };

            if status == StatusCode::UNAUTHORIZED {
                let server_message = match &body {
                    ResponseBody::Json(value) => error_field(value),
                    ResponseBody::Text(_) => None,
                };
                return Err(self.expire_session(server_message).into());
            }
            if !status.is_success() {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: error_message(status, &body),
                });
            }
            Ok::<_, ClientError>(body)
        })
        .await
        .map_err(|_| ClientError::Timeout(self.config.timeout_secs))?
    }

    fn expire_session(&self, server_message: Option<&str>) -> SessionError {
        warn!("Access token rejected, wiping session");
        if let Err(e) = self.session.wipe() {
            warn!("Failed to wipe session: {}", e);
        }
        let hook = self.on_token_expired.read().clone();
        if let Some(hook) = hook {
            hook();
        }
        SessionError::token_expired(server_message)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn error_field(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `error` field, then the JSON text, then the raw text, then the status.
fn error_message(status: StatusCode, body: &ResponseBody) -> String {
    let message = match body {
        ResponseBody::Json(value) => match error_field(value) {
            Some(message) => message.to_string(),
            None => value.to_string(),
        },
        ResponseBody::Text(text) => text.trim().to_string(),
    };
    if message.is_empty() {
        format!("Erro HTTP {}", status.as_u16())
    } else {
        message
    }
}
