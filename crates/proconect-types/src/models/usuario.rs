//! User records and the locally stored session user.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::lenient_list;
use super::relation::FlexibleId;

/// One portfolio entry; older profiles store bare URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortfolioEntry {
    Url(String),
    Item {
        #[serde(default)]
        id: Option<FlexibleId>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Worker profile aggregated by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerfilWorkerRecord {
    #[serde(default, deserialize_with = "lenient_list")]
    pub categorias: Option<Vec<String>>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub experiencia: Option<String>,
    #[serde(default)]
    pub disponibilidade: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub portfolio: Option<Vec<PortfolioEntry>>,
    #[serde(default)]
    pub preco_minimo: Option<f64>,
    #[serde(default)]
    pub preco_maximo: Option<f64>,
}

/// A user row, with the worker profile when the user is a professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsuarioRecord {
    pub id: String,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub apelido: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub is_worker: Option<bool>,
    #[serde(default)]
    pub email_verificado: Option<bool>,
    #[serde(default)]
    pub perfil_worker: Option<PerfilWorkerRecord>,
}

impl UsuarioRecord {
    /// Record with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nome: None,
            apelido: None,
            email: None,
            telefone: None,
            foto_url: None,
            cidade: None,
            estado: None,
            is_worker: None,
            email_verificado: None,
            perfil_worker: None,
        }
    }
}

/// The user kept under `usuarioLogado`.
///
/// The worker profile stays a free-form JSON object so partial updates can
/// be merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(default)]
    pub is_worker: bool,
    #[serde(default)]
    pub worker_profile: Option<Map<String, Value>>,
}

impl SessionUser {
    /// Build the stored user from a backend row.
    pub fn from_record(record: &UsuarioRecord) -> Self {
        let worker_profile = record
            .perfil_worker
            .as_ref()
            .and_then(|p| serde_json::to_value(p).ok())
            .and_then(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            });
        Self {
            id: record.id.clone(),
            nome: record.nome.clone().unwrap_or_default(),
            email: record.email.clone(),
            foto_url: record.foto_url.clone(),
            is_worker: record.is_worker.unwrap_or(false),
            worker_profile,
        }
    }

    /// Shallow-merge `patch` into the worker profile, creating it if absent.
    pub fn merge_worker_profile(&mut self, patch: Map<String, Value>) {
        let profile = self.worker_profile.get_or_insert_with(Map::new);
        for (key, value) in patch {
            profile.insert(key, value);
        }
    }
}
