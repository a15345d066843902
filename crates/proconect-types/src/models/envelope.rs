//! Response envelopes wrapping records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::anuncio::AnuncioRecord;
use super::proposta::PropostaRecord;
use super::usuario::UsuarioRecord;

/// `{ "items": [...] }` with optional pagination fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsEnvelope<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> ItemsEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// `/api/auth/login` and `/api/auth/register` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub profile: Option<UsuarioRecord>,
}

/// `/api/auth/me` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: String,
    #[serde(default)]
    pub profile: Option<UsuarioRecord>,
}

/// Upload endpoints answer with the stored object's location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(default)]
    pub profile: Option<UsuarioRecord>,
}

impl UploadResponse {
    /// Public URL of the uploaded file, whichever field carried it.
    pub fn location(&self) -> Option<&str> {
        self.url.as_deref().or(self.foto_url.as_deref())
    }
}

/// `/api/contratacoes/solicitar-direta` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContratacaoDiretaResponse {
    pub anuncio: AnuncioRecord,
    #[serde(default)]
    pub proposta: Option<PropostaRecord>,
    #[serde(default)]
    pub profissional: Option<UsuarioRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_must_be_an_array() {
        let ok: ItemsEnvelope<i64> = serde_json::from_str(r#"{"items":[1,2],"page":1}"#).unwrap();
        assert_eq!(ok.items, vec![1, 2]);
        assert!(serde_json::from_str::<ItemsEnvelope<i64>>(r#"{"items":{"a":1}}"#).is_err());
    }
}
