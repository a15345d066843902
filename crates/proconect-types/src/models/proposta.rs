//! Proposal (proposta) records as returned by `/api/propostas`.

use serde::{Deserialize, Serialize};

use super::anuncio::{CategoriaResumo, UsuarioResumo};
use super::enums::PropostaStatus;
use super::lenient::lenient;
use super::relation::Relation;

/// Listing columns embedded in a proposal join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnuncioResumo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub categorias: Option<Relation<CategoriaResumo>>,
    #[serde(default)]
    pub localizacao: Option<String>,
    #[serde(default)]
    pub prazo: Option<String>,
}

/// A bid placed by a professional on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropostaRecord {
    pub id: i64,
    pub anuncio_id: i64,
    #[serde(default)]
    pub usuario_id_worker: Option<String>,
    #[serde(default)]
    pub valor_proposto: Option<f64>,
    #[serde(default)]
    pub mensagem: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<PropostaStatus>,
    #[serde(default)]
    pub criada_em: Option<String>,
    #[serde(default)]
    pub usuarios: Option<Relation<UsuarioResumo>>,
    #[serde(default)]
    pub anuncios: Option<Relation<AnuncioResumo>>,
}

impl PropostaRecord {
    /// Effective status; rows without one are still "sent".
    pub fn status(&self) -> PropostaStatus {
        self.status.unwrap_or_default()
    }

    /// Professional who placed the bid, when the join embedded it.
    pub fn worker(&self) -> Option<&UsuarioResumo> {
        self.usuarios.as_ref().and_then(Relation::first)
    }

    /// Listing the bid belongs to, when the join embedded it.
    pub fn anuncio(&self) -> Option<&AnuncioResumo> {
        self.anuncios.as_ref().and_then(Relation::first)
    }
}
