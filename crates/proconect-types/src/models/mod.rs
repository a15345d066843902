//! Domain models for the ProConect marketplace.
//!
//! Records mirror backend rows, views are what the UI layer consumes and
//! payloads are what the client writes.

mod anuncio;
mod catalog;
mod chat;
mod enums;
mod envelope;
mod lenient;
pub mod payloads;
mod proposta;
mod relation;
mod usuario;
mod views;

// Re-export all models
pub use anuncio::{AnuncioRecord, CategoriaResumo, UserRef, UsuarioResumo};
pub use catalog::{AvaliacoesResumo, CategoriaRecord, EstatisticasProfissional};
pub use chat::{ConversaRecord, MensagemRecord};
pub use enums::{AnuncioStatus, AnuncioTipo, Ordem, PropostaStatus, Urgencia};
pub use envelope::{AuthResponse, ContratacaoDiretaResponse, ItemsEnvelope, MeResponse, UploadResponse};
pub use proposta::{AnuncioResumo, PropostaRecord};
pub use relation::{parse_timestamp, FlexibleId, Relation};
pub use usuario::{PerfilWorkerRecord, PortfolioEntry, SessionUser, UsuarioRecord};
pub use views::{
    AnuncioView, ClienteView, ConversaView, Direcao, MensagemView, PortfolioItem,
    ProfissionalView, WorkerProfileView,
};
