use serde_json::Value;
use tracing::info;
use validator::Validate;

use proconect_types::models::payloads::{LoginPayload, RegisterPayload};
use proconect_types::models::{AuthResponse, MeResponse};
use proconect_types::SessionUser;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientError;

impl ApiClient {
    /// `POST /api/auth/login`; stores the returned tokens and user.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let payload = LoginPayload { email: email.to_string(), password: password.to_string() };
        payload.validate()?;

        let response: AuthResponse =
            self.fetch("/api/auth/login", RequestOptions::post().json(&payload)?).await?;
        self.session()
            .set_tokens(response.access_token.as_deref(), response.refresh_token.as_deref())?;

        if let Some(user) = session_user(&response) {
            self.session().login(&user)?;
        }
        info!("Logged in as {}", email);
        Ok(response)
    }

    /// `POST /api/auth/register`. Does not log in.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse, ClientError> {
        payload.validate()?;
        self.fetch("/api/auth/register", RequestOptions::post().json(payload)?).await
    }

    /// `GET /api/auth/me`.
    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        self.fetch("/api/auth/me", RequestOptions::get()).await
    }
}

/// Profile row when present, else the bare `{id, email}` user.
fn session_user(response: &AuthResponse) -> Option<SessionUser> {
    if let Some(profile) = &response.profile {
        return Some(SessionUser::from_record(profile));
    }
    let user = response.user.as_ref()?;
    let id = user.get("id").and_then(Value::as_str)?;
    Some(SessionUser {
        id: id.to_string(),
        email: user.get("email").and_then(Value::as_str).map(str::to_string),
        ..SessionUser::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_user_prefers_profile() {
        let response: AuthResponse = serde_json::from_value(json!({
            "access_token": "a",
            "user": {"id": "u-1", "email": "ana@x.com"},
            "profile": {"id": "u-1", "nome": "Ana", "is_worker": true}
        }))
        .unwrap();
        let user = session_user(&response).unwrap();
        assert_eq!(user.nome, "Ana");
        assert!(user.is_worker);
    }

    #[test]
    fn test_session_user_falls_back_to_user() {
        let response: AuthResponse = serde_json::from_value(json!({
            "user": {"id": "u-2", "email": "bia@x.com"},
            "profile": null
        }))
        .unwrap();
        let user = session_user(&response).unwrap();
        assert_eq!(user.id, "u-2");
        assert_eq!(user.email.as_deref(), Some("bia@x.com"));

        let empty: AuthResponse = serde_json::from_value(json!({})).unwrap();
        assert!(session_user(&empty).is_none());
    }
}
