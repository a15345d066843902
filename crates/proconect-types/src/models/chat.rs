//! Conversation and message records as returned by `/api/conversas`.

use serde::{Deserialize, Serialize};

/// A two-party conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversaRecord {
    pub id: i64,
    pub usuario_a_id: String,
    pub usuario_b_id: String,
    #[serde(default)]
    pub criado_em: Option<String>,
    #[serde(default)]
    pub contexto_tipo: Option<String>,
    #[serde(default)]
    pub contexto_id: Option<i64>,
}

impl ConversaRecord {
    /// The participant that is not `current_user_id`.
    pub fn other_participant(&self, current_user_id: &str) -> &str {
        if self.usuario_a_id == current_user_id {
            &self.usuario_b_id
        } else {
            &self.usuario_a_id
        }
    }
}

/// A message inside a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MensagemRecord {
    pub id: i64,
    #[serde(default)]
    pub conversa_id: Option<i64>,
    pub remetente_id: String,
    #[serde(default)]
    pub conteudo: Option<String>,
    #[serde(default)]
    pub lida: Option<bool>,
    #[serde(default)]
    pub enviada_em: Option<String>,
}
