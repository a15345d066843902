//! Session-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown whenever the user has to log in again.
pub const RELOGIN_MESSAGE: &str =
    "Token inválido ou expirado. Por favor, reinicie sua sessão fazendo login novamente.";

/// Errors raised by the client-side session.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SessionError {
    /// An authenticated call was attempted without an access token
    #[error("Usuário não autenticado. Por favor, faça login novamente.")]
    NotAuthenticated,

    /// The backend rejected the token (HTTP 401)
    #[error("{message}")]
    TokenExpired {
        /// User-facing explanation, always asking for a new login
        message: String,
    },
}

impl SessionError {
    /// Build a [`SessionError::TokenExpired`] from a server message.
    ///
    /// The message is kept when it already tells the user to log in again,
    /// otherwise the relogin instruction is appended.
    pub fn token_expired(server_message: Option<&str>) -> Self {
        let message = match server_message.map(str::trim).filter(|m| !m.is_empty()) {
            None => RELOGIN_MESSAGE.to_string(),
            Some(m) if m.contains("login") || m.contains("sessão") => m.to_string(),
            Some(m) => format!("{m} Por favor, reinicie sua sessão fazendo login novamente."),
        };
        Self::TokenExpired { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expired_appends_instruction() {
        let err = SessionError::token_expired(Some("Token expirado"));
        assert_eq!(
            err.to_string(),
            "Token expirado Por favor, reinicie sua sessão fazendo login novamente."
        );
    }

    #[test]
    fn test_token_expired_keeps_login_hint() {
        let err = SessionError::token_expired(Some("Faça login de novo"));
        assert_eq!(err.to_string(), "Faça login de novo");
    }

    #[test]
    fn test_token_expired_default() {
        assert_eq!(SessionError::token_expired(None).to_string(), RELOGIN_MESSAGE);
        assert_eq!(SessionError::token_expired(Some("  ")).to_string(), RELOGIN_MESSAGE);
    }
}
