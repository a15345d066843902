//! User-facing messages for failed proposal submissions.

use crate::error::ClientError;

pub const DUPLICATE_MESSAGE: &str = "Você já enviou uma proposta para este serviço.";
pub const OWN_LISTING_MESSAGE: &str = "Você não pode enviar uma proposta para seu próprio anúncio.";
pub const MISSING_LISTING_MESSAGE: &str = "Este serviço não foi encontrado. Ele pode ter sido removido.";
pub const GENERIC_MESSAGE: &str = "Erro ao enviar proposta. Tente novamente.";

/// Outcome shown when a proposal could not be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalFailure {
    pub message: String,
    /// The professional already has a proposal on this listing and should
    /// edit it instead.
    pub duplicate: bool,
}

/// Translate a proposal error into the message shown to the user.
pub fn friendly_proposal_error(error: &ClientError) -> ProposalFailure {
    let raw = error.to_string();
    let (message, duplicate) = if raw.contains("já enviou uma proposta")
        || raw.contains("duplicate")
        || raw.contains("23505")
    {
        (DUPLICATE_MESSAGE.to_string(), true)
    } else if raw.contains("não pode propor no seu próprio anúncio") {
        (OWN_LISTING_MESSAGE.to_string(), false)
    } else if raw.contains("Anúncio não encontrado") {
        (MISSING_LISTING_MESSAGE.to_string(), false)
    } else if raw.trim().is_empty() {
        (GENERIC_MESSAGE.to_string(), false)
    } else {
        (raw, false)
    };
    ProposalFailure { message, duplicate }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ClientError {
        ClientError::Api { status, message: message.to_string() }
    }

    #[test]
    fn test_duplicate_variants() {
        for raw in [
            "Você já enviou uma proposta para este serviço. Você pode editar sua proposta existente na página 'Meus Serviços'.",
            "duplicate key value violates unique constraint",
            "Falha ao criar proposta: 23505",
        ] {
            let failure = friendly_proposal_error(&api(409, raw));
            assert!(failure.duplicate, "{raw}");
            assert_eq!(failure.message, DUPLICATE_MESSAGE);
        }
    }

    #[test]
    fn test_other_messages() {
        let own = friendly_proposal_error(&api(400, "Você não pode propor no seu próprio anúncio"));
        assert_eq!(own.message, OWN_LISTING_MESSAGE);
        assert!(!own.duplicate);

        let missing = friendly_proposal_error(&api(404, "Anúncio não encontrado"));
        assert_eq!(missing.message, MISSING_LISTING_MESSAGE);

        let other = friendly_proposal_error(&api(500, "Falha ao criar proposta: timeout"));
        assert_eq!(other.message, "Falha ao criar proposta: timeout");

        let blank = friendly_proposal_error(&api(500, " "));
        assert_eq!(blank.message, GENERIC_MESSAGE);
    }
}
