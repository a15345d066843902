//! Backend records to view models.
//!
//! Mapping never fails: shape problems are caught when the response is
//! decoded, and missing optional fields fall back to display defaults here.

mod anuncio;
mod chat;
mod enrich;
mod profissional;

pub use anuncio::{map_anuncio_to_frontend, map_anuncios_to_frontend};
pub use chat::{
    format_pt_br, map_conversa_to_frontend, map_conversas_to_frontend, map_mensagem_to_frontend,
    map_mensagens_to_frontend,
};
pub use enrich::AnuncioEnricher;
pub use profissional::{map_profissionais_to_frontend, map_profissional_to_frontend};

/// Display name used when a user row has none.
pub const DEFAULT_USER_NAME: &str = "Usuário";
