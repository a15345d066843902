//! Listing (anúncio) records as returned by `/api/anuncios`.

use serde::{Deserialize, Serialize};

use super::enums::{AnuncioStatus, AnuncioTipo, Urgencia};
use super::lenient::{lenient, lenient_list};
use super::relation::Relation;

/// Category columns embedded in a listing join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoriaResumo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub icone: Option<String>,
}

/// User columns embedded in a listing or proposal join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsuarioResumo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(default)]
    pub email_verificado: Option<bool>,
}

/// The `usuario_id` column, which some select syntaxes replace by the
/// embedded user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Embedded(Relation<UsuarioResumo>),
}

impl UserRef {
    /// Owner id, whichever shape carried it.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id.as_str()),
            Self::Embedded(rel) => rel.first().and_then(|u| u.id.as_deref()),
        }
    }

    /// Embedded owner row, if the join produced one.
    pub fn embedded(&self) -> Option<&UsuarioResumo> {
        match self {
            Self::Id(_) => None,
            Self::Embedded(rel) => rel.first(),
        }
    }
}

/// A listing row with its category and owner joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnuncioRecord {
    pub id: i64,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub categorias: Option<Relation<CategoriaResumo>>,
    #[serde(default)]
    pub usuario_id: Option<UserRef>,
    #[serde(default)]
    pub usuarios: Option<Relation<UsuarioResumo>>,
    #[serde(default)]
    pub localizacao: Option<String>,
    #[serde(default)]
    pub publicado_em: Option<String>,
    #[serde(default)]
    pub prazo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub urgencia: Option<Urgencia>,
    #[serde(default, deserialize_with = "lenient")]
    pub tipo: Option<AnuncioTipo>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub requisitos: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub imagens: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<AnuncioStatus>,
    #[serde(default)]
    pub preco_min: Option<f64>,
    #[serde(default)]
    pub preco_max: Option<f64>,
}

impl AnuncioRecord {
    /// Minimal record, mostly useful when building fixtures.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            titulo: None,
            descricao: None,
            categoria_id: None,
            categorias: None,
            usuario_id: None,
            usuarios: None,
            localizacao: None,
            publicado_em: None,
            prazo: None,
            urgencia: None,
            tipo: None,
            requisitos: None,
            imagens: None,
            status: None,
            preco_min: None,
            preco_max: None,
        }
    }

    /// Owner row, preferring the `usuarios` join over an embedded `usuario_id`.
    pub fn owner(&self) -> Option<&UsuarioResumo> {
        self.usuarios
            .as_ref()
            .and_then(Relation::first)
            .or_else(|| self.usuario_id.as_ref().and_then(UserRef::embedded))
    }

    /// Owner id from `usuario_id` or from the embedded row.
    pub fn owner_id(&self) -> Option<&str> {
        self.usuario_id
            .as_ref()
            .and_then(UserRef::id)
            .or_else(|| self.owner().and_then(|u| u.id.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_joined_listing() {
        let json = serde_json::json!({
            "id": 12,
            "titulo": "Pintar sala",
            "categorias": [{"nome": "Reformas"}],
            "usuario_id": "u-1",
            "usuarios": {"nome": "Ana", "email_verificado": true},
            "urgencia": "alta",
            "preco_min": 100,
            "imagens": null
        });
        let record: AnuncioRecord = serde_json::from_value(json).unwrap();

        assert_eq!(record.owner_id(), Some("u-1"));
        assert_eq!(record.owner().and_then(|u| u.nome.as_deref()), Some("Ana"));
        assert_eq!(record.urgencia, Some(Urgencia::Alta));
        assert_eq!(record.preco_min, Some(100.0));
        assert!(record.imagens.is_none());
    }

    #[test]
    fn test_owner_embedded_in_usuario_id() {
        let json = serde_json::json!({
            "id": 3,
            "usuario_id": {"id": "u-9", "nome": "Caio"}
        });
        let record: AnuncioRecord = serde_json::from_value(json).unwrap();

        assert_eq!(record.owner_id(), Some("u-9"));
        assert_eq!(record.owner().and_then(|u| u.nome.as_deref()), Some("Caio"));
    }

    #[test]
    fn test_odd_optional_columns_default() {
        let json = serde_json::json!({
            "id": 4,
            "urgencia": "baixa",
            "tipo": "",
            "status": "arquivado",
            "requisitos": "trazer escada",
            "imagens": ["a.png", null]
        });
        let record: AnuncioRecord = serde_json::from_value(json).unwrap();

        assert_eq!(record.urgencia, None);
        assert_eq!(record.tipo, None);
        assert_eq!(record.status, None);
        assert_eq!(record.requisitos, None);
        assert_eq!(record.imagens, Some(vec!["a.png".to_string()]));
    }

    #[test]
    fn test_missing_id_fails_loudly() {
        let json = serde_json::json!({"titulo": "sem id"});
        assert!(serde_json::from_value::<AnuncioRecord>(json).is_err());
    }
}
