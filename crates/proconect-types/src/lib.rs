//! # ProConect Types
//!
//! Core types, models, and error definitions for the ProConect marketplace client.
//!
//! - **`error`** - Typed error hierarchy for session and payload problems
//! - **`models`** - Backend records, frontend view models and write payloads
//!
//! ## Architecture Role
//!
//! `proconect-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        proconect-types (this crate)
//!                 │
//!                 ▼
//!         proconect-client
//!                 │
//!                 ▼
//!          proconect-cli
//! ```
//!
//! Backend records require their key columns. Optional columns with an
//! unknown value or the wrong shape decode to `None` with a warning, so one
//! odd row never fails a whole list. View models are what the mappers in
//! `proconect-client` produce.

pub mod error;
pub mod models;

pub use error::{PayloadError, Result, SessionError, TypedError};

pub use models::{
    AnuncioRecord, AnuncioStatus, AnuncioTipo, AnuncioView, ConversaRecord, ConversaView,
    ItemsEnvelope, MensagemRecord, MensagemView, ProfissionalView, PropostaRecord, PropostaStatus,
    Relation, SessionUser, Urgencia, UsuarioRecord,
};
