use validator::Validate;

use proconect_types::models::payloads::ContratacaoDireta;
use proconect_types::models::ContratacaoDiretaResponse;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `POST /api/contratacoes/solicitar-direta`: creates a listing aimed at
    /// one professional plus a proposal on their behalf.
    pub async fn solicitar_contratacao_direta(
        &self,
        payload: &ContratacaoDireta,
    ) -> Result<ContratacaoDiretaResponse, ClientError> {
        payload.validate()?;
        let options = RequestOptions::post()
            .loading_message("Enviando sua solicitação ao profissional.")
            .json(payload)?;
        self.fetch("/api/contratacoes/solicitar-direta", options).await
    }
}
