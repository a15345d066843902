//! Error types for the ProConect client.

use proconect_types::{PayloadError, SessionError};
use thiserror::Error;

/// Errors that can occur when using the ProConect client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client configuration is missing or invalid.
    #[error("Configuração inválida: {0}")]
    Config(String),

    /// HTTP request failed before a response arrived.
    #[error("Falha de rede: {0}")]
    Network(#[from] reqwest::Error),

    /// The per-attempt deadline elapsed.
    #[error("Tempo limite de {0}s excedido")]
    Timeout(u64),

    /// Server answered with a non-2xx status; `message` is the server's own.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// The session could not be used (missing or rejected token).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A write payload failed validation before being sent.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Server returned a body that does not match the expected shape.
    #[error("Resposta inválida de {path}: {message}")]
    InvalidResponse {
        /// Request path that produced the body.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// Local persisted state could not be read or written.
    #[error("Falha no armazenamento local: {0}")]
    Storage(String),

    /// Local JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Network-class failures are the only ones worth retrying.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// HTTP status when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Session(SessionError::TokenExpired { .. }) => Some(401),
            _ => None,
        }
    }

    /// True when the session was rejected and has been wiped.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Session(SessionError::TokenExpired { .. }))
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Payload(PayloadError::from(errors))
    }
}
