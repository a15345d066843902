use proconect_types::models::payloads::ProfissionalQuery;
use proconect_types::models::{AvaliacoesResumo, EstatisticasProfissional, ItemsEnvelope, UsuarioRecord};

use super::{segment, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `GET /api/profissionais`.
    pub async fn list_profissionais(
        &self,
        query: &ProfissionalQuery,
    ) -> Result<Vec<UsuarioRecord>, ClientError> {
        let path = with_query("/api/profissionais", &query.to_pairs());
        let envelope: ItemsEnvelope<UsuarioRecord> = self.fetch(&path, RequestOptions::get()).await?;
        Ok(envelope.into_items())
    }

    /// `GET /api/profissionais/estatisticas/{id}`; batch lookup, no overlay.
    pub async fn get_estatisticas_profissional(
        &self,
        usuario_id: &str,
    ) -> Result<EstatisticasProfissional, ClientError> {
        let options = RequestOptions::get().without_loading().retries(1);
        self.fetch(&format!("/api/profissionais/estatisticas/{}", segment(usuario_id)), options).await
    }

    /// `GET /api/avaliacoes/por-contratado/{id}`; batch lookup, no overlay.
    pub async fn get_avaliacoes_por_contratado(
        &self,
        usuario_id: &str,
    ) -> Result<AvaliacoesResumo, ClientError> {
        let options = RequestOptions::get().without_loading().retries(1);
        self.fetch(&format!("/api/avaliacoes/por-contratado/{}", segment(usuario_id)), options).await
    }
}
