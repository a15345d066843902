use serde_json::json;

use proconect_types::models::payloads::{AtualizacaoMensagem, NovaConversa};
use proconect_types::models::{ConversaRecord, ItemsEnvelope, MensagemRecord};
use proconect_types::PayloadError;

use super::require_row;
use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `GET /api/conversas`, most recent activity first.
    pub async fn list_conversas(&self) -> Result<Vec<ConversaRecord>, ClientError> {
        let envelope: ItemsEnvelope<ConversaRecord> =
            self.fetch("/api/conversas", RequestOptions::get()).await?;
        Ok(envelope.into_items())
    }

    /// `POST /api/conversas`; returns the existing conversation when the pair
    /// already has one.
    pub async fn criar_conversa(&self, payload: &NovaConversa) -> Result<ConversaRecord, ClientError> {
        let path = "/api/conversas";
        let row: Option<ConversaRecord> = self.fetch(path, RequestOptions::post().json(payload)?).await?;
        require_row(path, row)
    }

    pub async fn obter_conversa(&self, conversa_id: i64) -> Result<ConversaRecord, ClientError> {
        self.fetch(&format!("/api/conversas/{conversa_id}"), RequestOptions::get()).await
    }

    pub async fn list_mensagens(&self, conversa_id: i64) -> Result<Vec<MensagemRecord>, ClientError> {
        let envelope: ItemsEnvelope<MensagemRecord> = self
            .fetch(&format!("/api/conversas/{conversa_id}/mensagens"), RequestOptions::get())
            .await?;
        Ok(envelope.into_items())
    }

    pub async fn enviar_mensagem(
        &self,
        conversa_id: i64,
        conteudo: &str,
    ) -> Result<MensagemRecord, ClientError> {
        if conteudo.trim().is_empty() {
            return Err(PayloadError::Invalid {
                field: "conteudo".to_string(),
                message: "A mensagem não pode ser vazia".to_string(),
            }
            .into());
        }
        let path = format!("/api/conversas/{conversa_id}/mensagens");
        let options = RequestOptions::post().json(&json!({ "conteudo": conteudo }))?;
        let row: Option<MensagemRecord> = self.fetch(&path, options).await?;
        require_row(&path, row)
    }

    /// `PATCH /api/mensagens/{id}`.
    pub async fn atualizar_mensagem(
        &self,
        mensagem_id: i64,
        changes: &AtualizacaoMensagem,
    ) -> Result<MensagemRecord, ClientError> {
        let path = format!("/api/mensagens/{mensagem_id}");
        let row: Option<MensagemRecord> =
            self.fetch(&path, RequestOptions::patch().without_loading().json(changes)?).await?;
        require_row(&path, row)
    }
}
