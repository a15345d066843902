use validator::Validate;

use proconect_types::models::payloads::{AtualizacaoProposta, NovaProposta};
use proconect_types::models::{ItemsEnvelope, PropostaRecord};

use super::{require_row, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `POST /api/propostas`.
    ///
    /// Duplicate and self proposals come back as [`ClientError::Api`]; see
    /// [`crate::proposals::friendly_proposal_error`].
    pub async fn create_proposta(&self, payload: &NovaProposta) -> Result<PropostaRecord, ClientError> {
        payload.validate()?;
        let path = "/api/propostas";
        let row: Option<PropostaRecord> =
            self.fetch(path, RequestOptions::post().json(payload)?).await?;
        require_row(path, row)
    }

    /// `GET /api/propostas`.
    ///
    /// With `anuncio_id`, the proposals of that listing (owner only); with
    /// `recebidas`, proposals received by the session user; otherwise the
    /// ones the session user sent.
    pub async fn list_propostas(
        &self,
        anuncio_id: Option<i64>,
        recebidas: bool,
    ) -> Result<Vec<PropostaRecord>, ClientError> {
        let mut pairs = Vec::new();
        if let Some(id) = anuncio_id {
            pairs.push(("anuncio_id", id.to_string()));
        }
        if recebidas {
            pairs.push(("recebidas", "true".to_string()));
        }
        let path = with_query("/api/propostas", &pairs);
        let envelope: ItemsEnvelope<PropostaRecord> = self.fetch(&path, RequestOptions::get()).await?;
        Ok(envelope.into_items())
    }

    /// Proposal count of one listing, without the loading overlay.
    pub async fn count_propostas(&self, anuncio_id: i64) -> Result<usize, ClientError> {
        let path = with_query("/api/propostas", &[("anuncio_id", anuncio_id.to_string())]);
        let envelope: ItemsEnvelope<PropostaRecord> =
            self.fetch(&path, RequestOptions::get().without_loading()).await?;
        Ok(envelope.items.len())
    }

    pub async fn update_proposta(
        &self,
        proposta_id: i64,
        changes: &AtualizacaoProposta,
    ) -> Result<PropostaRecord, ClientError> {
        let path = format!("/api/propostas/{proposta_id}");
        let row: Option<PropostaRecord> =
            self.fetch(&path, RequestOptions::patch().json(changes)?).await?;
        require_row(&path, row)
    }

    pub async fn delete_proposta(&self, proposta_id: i64) -> Result<(), ClientError> {
        self.fetch_body(&format!("/api/propostas/{proposta_id}"), RequestOptions::delete()).await?;
        Ok(())
    }
}
