//! View models produced by the mappers.
//!
//! These are transient copies of backend state; every mutation is followed
//! by a re-fetch, so nothing here is written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{AnuncioStatus, AnuncioTipo, Urgencia};

/// Listing owner as shown on a listing card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteView {
    pub id: Option<String>,
    pub nome: String,
    pub foto_url: Option<String>,
    pub verificado: bool,
    pub avaliacao: f64,
    pub total_avaliacoes: u32,
    /// Owner row was not embedded; resolve it with a user lookup.
    #[serde(rename = "_precisaBuscar")]
    pub precisa_buscar: bool,
}

/// A listing ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnuncioView {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    pub categoria: String,
    pub categoria_id: Option<i64>,
    pub localizacao: String,
    pub data_publicacao: DateTime<Utc>,
    pub prazo: Option<String>,
    pub urgencia: Urgencia,
    pub tipo: AnuncioTipo,
    pub cliente: ClienteView,
    pub requisitos: Vec<String>,
    pub imagens: Vec<String>,
    pub status: AnuncioStatus,
    pub preco_min: Option<f64>,
    pub preco_max: Option<f64>,
    pub visualizacoes: u32,
    /// Proposal count, filled in by callers that fetch it.
    pub propostas: usize,
}

/// Direction of a message relative to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direcao {
    Enviada,
    Recebida,
}

/// A chat message ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MensagemView {
    /// Server id; optimistic messages carry a negative placeholder.
    pub id: i64,
    pub texto: String,
    pub tipo: Direcao,
    pub data_hora: String,
    pub lida: bool,
    pub enviada_em: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pendente: bool,
}

/// A conversation as listed in the inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversaView {
    pub id: i64,
    pub nome: String,
    pub empresa: String,
    pub avatar: String,
    pub mensagens: Vec<MensagemView>,
    /// The other participant.
    pub usuario_id: String,
    pub criado_em: Option<DateTime<Utc>>,
}

impl ConversaView {
    /// Time used for inbox ordering: last message, else creation.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.mensagens.last().and_then(|m| m.enviada_em).or(self.criado_em)
    }
}

/// Normalized portfolio entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: String,
    pub url: String,
    pub name: String,
}

/// Worker profile with ratings folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfileView {
    pub avaliacao: f64,
    pub total_avaliacoes: u32,
    pub projetos_concluidos: u32,
    pub categorias: Vec<String>,
    pub descricao: String,
    pub experiencia: String,
    pub disponibilidade: Map<String, Value>,
    pub portfolio: Vec<PortfolioItem>,
    pub preco_minimo: Option<f64>,
    pub preco_maximo: Option<f64>,
}

/// A professional as shown in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfissionalView {
    pub id: String,
    pub nome: String,
    pub apelido: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub foto: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub is_worker: bool,
    pub worker_profile: WorkerProfileView,
}
