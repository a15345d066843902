#![doc = include_str!("../README.md")]

mod api;
mod client;
mod config;
mod error;
pub mod listing;
pub mod loading;
pub mod mappers;
pub mod messaging;
pub mod notifications;
pub mod proposals;
pub mod session;
pub mod storage;
pub mod watcher;

pub use client::{ApiClient, RequestOptions, ResponseBody, TokenExpiredHook};
pub use config::{Backoff, ClientConfig, RetryConfig};
pub use error::ClientError;
pub use listing::{ListingFilter, ProfessionalFilter};
pub use loading::{
    LoadingBus, LoadingDescriptor, LoadingEntry, LoadingEvent, LoadingGuard, LoadingId, LoadingOverlay,
    LoadingStack,
};
pub use mappers::AnuncioEnricher;
pub use notifications::{Notification, NotificationCenter, NotificationKind, NotificationOptions};
pub use proposals::{friendly_proposal_error, ProposalFailure};
pub use session::SessionStore;
pub use storage::{PersistedState, ProposalCounts, StateKey};
pub use watcher::{diff_counts, NewProposalsAlert, PollOutcome, ProposalWatcher, WatcherConfig};

pub use proconect_types as types;
