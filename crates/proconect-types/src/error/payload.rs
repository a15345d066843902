//! Payload validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// Errors detected before a write payload leaves the client.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum PayloadError {
    /// A field failed validation
    #[error("Validation error for {field}: {message}")]
    Invalid {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl PayloadError {
    /// Collapse `validator` output into the first failing field.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, errs)) = fields.into_iter().next() else {
            return Self::Invalid { field: "payload".to_string(), message: errors.to_string() };
        };
        let message = errs
            .first()
            .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("valor inválido para {field}"));
        Self::Invalid { field: field.to_string(), message }
    }
}

impl From<ValidationErrors> for PayloadError {
    fn from(errors: ValidationErrors) -> Self {
        Self::from_validation(&errors)
    }
}
