//! Write payloads and query parameters sent to the backend.
//!
//! Create payloads derive `Validate`; the client refuses to send a payload
//! that fails validation.

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::enums::{AnuncioStatus, AnuncioTipo, Ordem, PropostaStatus, Urgencia};

/// `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginPayload {
    /// E-mail or CPF
    #[validate(length(min = 1, message = "Informe e-mail ou CPF"))]
    pub email: String,
    #[validate(length(min = 1, message = "Informe a senha"))]
    pub password: String,
}

/// `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub nome: String,
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres"))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_worker: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfil_worker: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferencias: Option<Value>,
}

fn validate_faixa_preco(min: Option<f64>, max: Option<f64>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("faixa_preco")
            .with_message("O preço mínimo não pode ser maior que o máximo".into())),
        _ => Ok(()),
    }
}

fn validate_novo_anuncio(payload: &NovoAnuncio) -> Result<(), ValidationError> {
    validate_faixa_preco(payload.preco_min, payload.preco_max)
}

fn validate_contratacao(payload: &ContratacaoDireta) -> Result<(), ValidationError> {
    validate_faixa_preco(payload.preco_min, payload.preco_max)
}

/// `POST /api/anuncios`.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_novo_anuncio"))]
pub struct NovoAnuncio {
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub titulo: String,
    #[validate(length(min = 1, message = "Descrição é obrigatória"))]
    pub descricao: String,
    pub categoria_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Preço inválido"))]
    pub preco_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Preço inválido"))]
    pub preco_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prazo: Option<String>,
    pub urgencia: Urgencia,
    pub tipo: AnuncioTipo,
    pub requisitos: Vec<String>,
    pub imagens: Vec<String>,
}

impl NovoAnuncio {
    /// Listing with the required fields and defaults for the rest.
    pub fn new(titulo: impl Into<String>, descricao: impl Into<String>, categoria_id: i64) -> Self {
        Self {
            titulo: titulo.into(),
            descricao: descricao.into(),
            categoria_id,
            localizacao: None,
            preco_min: None,
            preco_max: None,
            prazo: None,
            urgencia: Urgencia::Normal,
            tipo: AnuncioTipo::Oportunidade,
            requisitos: Vec::new(),
            imagens: Vec::new(),
        }
    }
}

/// `PATCH /api/anuncios/{id}`; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AtualizacaoAnuncio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prazo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgencia: Option<Urgencia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AnuncioStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requisitos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagens: Option<Vec<String>>,
}

/// `POST /api/propostas`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NovaProposta {
    pub anuncio_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Valor proposto inválido"))]
    pub valor_proposto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

/// `PATCH /api/propostas/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AtualizacaoProposta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_proposto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropostaStatus>,
}

/// `POST /api/conversas`.
#[derive(Debug, Clone, Serialize)]
pub struct NovaConversa {
    pub usuario_b_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexto_tipo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexto_id: Option<i64>,
}

/// `PATCH /api/mensagens/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AtualizacaoMensagem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lida: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conteudo: Option<String>,
}

impl AtualizacaoMensagem {
    pub fn marcar_lida() -> Self {
        Self { lida: Some(true), conteudo: None }
    }
}

/// `POST /api/contratacoes/solicitar-direta`.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_contratacao"))]
pub struct ContratacaoDireta {
    #[validate(length(min = 1, message = "Profissional é obrigatório"))]
    pub profissional_id: String,
    pub categoria_id: i64,
    #[validate(length(min = 1, message = "Título é obrigatório"))]
    pub titulo: String,
    #[validate(length(min = 1, message = "Descrição é obrigatória"))]
    pub descricao: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prazo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgencia: Option<Urgencia>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requisitos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_proposto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

/// Query parameters of `GET /api/anuncios`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnuncioQuery {
    pub tipo: Option<AnuncioTipo>,
    pub categoria_id: Option<i64>,
    pub busca: Option<String>,
    pub urgencia: Option<Urgencia>,
    pub status: Option<AnuncioStatus>,
    pub order: Option<Ordem>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AnuncioQuery {
    /// Non-empty parameters in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "tipo", self.tipo.map(|t| t.to_string()));
        push_pair(&mut pairs, "categoria_id", self.categoria_id.map(|c| c.to_string()));
        push_pair(&mut pairs, "busca", self.busca.clone());
        push_pair(&mut pairs, "urgencia", self.urgencia.map(|u| u.to_string()));
        push_pair(&mut pairs, "status", self.status.map(|s| s.to_string()));
        push_pair(&mut pairs, "order", self.order.map(|o| o.to_string()));
        push_pair(&mut pairs, "page", self.page.map(|p| p.to_string()));
        push_pair(&mut pairs, "page_size", self.page_size.map(|p| p.to_string()));
        pairs
    }
}

/// Query parameters of `GET /api/profissionais`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfissionalQuery {
    pub busca: Option<String>,
    pub categoria: Option<String>,
    pub localizacao: Option<String>,
}

impl ProfissionalQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "busca", self.busca.clone());
        push_pair(&mut pairs, "categoria", self.categoria.clone());
        push_pair(&mut pairs, "localizacao", self.localizacao.clone());
        pairs
    }
}

fn push_pair(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        pairs.push((key, value));
    }
}
