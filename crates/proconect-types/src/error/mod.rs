//! Typed error definitions for ProConect.
//!
//! Domain errors are serializable so they can be stored or echoed back to a
//! caller, and composable through [`TypedError`].

mod payload;
mod session;

pub use payload::PayloadError;
pub use session::{SessionError, RELOGIN_MESSAGE};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a session-related error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Wraps a payload validation error
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;
