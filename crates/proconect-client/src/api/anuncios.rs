use reqwest::multipart::{Form, Part};
use validator::Validate;

use proconect_types::models::payloads::{AnuncioQuery, AtualizacaoAnuncio, NovoAnuncio};
use proconect_types::models::{AnuncioRecord, ItemsEnvelope, UploadResponse};

use super::{require_row, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `GET /api/anuncios` with the non-empty filters of `query`.
    pub async fn list_anuncios(
        &self,
        query: &AnuncioQuery,
    ) -> Result<ItemsEnvelope<AnuncioRecord>, ClientError> {
        let path = with_query("/api/anuncios", &query.to_pairs());
        self.fetch(&path, RequestOptions::get()).await
    }

    pub async fn get_anuncio(&self, anuncio_id: i64) -> Result<AnuncioRecord, ClientError> {
        self.fetch(&format!("/api/anuncios/{anuncio_id}"), RequestOptions::get()).await
    }

    /// `POST /api/anuncios`; the payload is validated first.
    pub async fn create_anuncio(&self, payload: &NovoAnuncio) -> Result<AnuncioRecord, ClientError> {
        payload.validate()?;
        let path = "/api/anuncios";
        let row: Option<AnuncioRecord> = self.fetch(path, RequestOptions::post().json(payload)?).await?;
        require_row(path, row)
    }

    pub async fn update_anuncio(
        &self,
        anuncio_id: i64,
        changes: &AtualizacaoAnuncio,
    ) -> Result<AnuncioRecord, ClientError> {
        let path = format!("/api/anuncios/{anuncio_id}");
        let row: Option<AnuncioRecord> =
            self.fetch(&path, RequestOptions::patch().json(changes)?).await?;
        require_row(&path, row)
    }

    pub async fn delete_anuncio(&self, anuncio_id: i64) -> Result<(), ClientError> {
        self.fetch_body(&format!("/api/anuncios/{anuncio_id}"), RequestOptions::delete()).await?;
        Ok(())
    }

    /// `GET /api/anuncios/meus`: listings owned by the session user.
    pub async fn list_meus_anuncios(&self) -> Result<Vec<AnuncioRecord>, ClientError> {
        let envelope: ItemsEnvelope<AnuncioRecord> =
            self.fetch("/api/anuncios/meus", RequestOptions::get()).await?;
        Ok(envelope.into_items())
    }

    /// `POST /api/anuncios/upload-imagem`, optionally tied to a listing.
    pub async fn upload_anuncio_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        anuncio_id: Option<i64>,
    ) -> Result<UploadResponse, ClientError> {
        let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        if let Some(id) = anuncio_id {
            form = form.text("anuncio_id", id.to_string());
        }
        self.upload("/api/anuncios/upload-imagem", form).await
    }
}
