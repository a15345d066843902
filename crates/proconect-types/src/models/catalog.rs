//! Categories, ratings and professional statistics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A service category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriaRecord {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    pub nome: String,
    #[serde(default)]
    pub icone: Option<String>,
}

/// `/api/avaliacoes/por-contratado/{id}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvaliacoesResumo {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub media: f64,
    #[serde(default)]
    pub total: u32,
}

/// `/api/profissionais/estatisticas/{id}` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstatisticasProfissional {
    #[serde(default)]
    pub projetos_concluidos: u32,
    #[serde(default)]
    pub total_contratacoes: u32,
}
