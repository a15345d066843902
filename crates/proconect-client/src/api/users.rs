use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Map, Value};

use proconect_types::models::{UploadResponse, UsuarioRecord};

use super::segment;
use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    #[serde(default)]
    profile: Option<UsuarioRecord>,
}

impl ApiClient {
    /// `PATCH /api/users/me` with the fields to change.
    pub async fn update_me(&self, changes: &Map<String, Value>) -> Result<UsuarioRecord, ClientError> {
        self.fetch("/api/users/me", RequestOptions::patch().json(changes)?).await
    }

    /// `POST /api/users/me/onboarding`.
    pub async fn save_onboarding(&self, answers: &Value) -> Result<Option<UsuarioRecord>, ClientError> {
        let envelope: ProfileEnvelope =
            self.fetch("/api/users/me/onboarding", RequestOptions::post().json(answers)?).await?;
        Ok(envelope.profile)
    }

    /// `POST /api/users/me/foto` as multipart field `file`.
    pub async fn upload_profile_photo(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        self.upload("/api/users/me/foto", Form::new().part("file", part)).await
    }

    /// `GET /api/users/{id}`: public basic data, no overlay, two retries.
    pub async fn get_user(&self, user_id: &str) -> Result<UsuarioRecord, ClientError> {
        let options = RequestOptions::get().without_loading().retries(2);
        self.fetch(&format!("/api/users/{}", segment(user_id)), options).await
    }
}
