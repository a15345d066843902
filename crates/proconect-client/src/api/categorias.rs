use proconect_types::models::{CategoriaRecord, ItemsEnvelope};

use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `GET /api/categorias`.
    pub async fn list_categorias(&self) -> Result<Vec<CategoriaRecord>, ClientError> {
        let envelope: ItemsEnvelope<CategoriaRecord> =
            self.fetch("/api/categorias", RequestOptions::get()).await?;
        Ok(envelope.into_items())
    }
}
