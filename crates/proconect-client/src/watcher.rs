//! New-proposal watcher
//!
//! Polls the session user's listings, counts proposals per listing and
//! compares against the last persisted snapshot (`ultimasPropostasContadas`).
//!
//! - First sighting of a listing (previous count 0) never alerts
//! - An increase alerts once, citing the difference
//! - A listing whose count could not be fetched keeps its previous count

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use proconect_types::AnuncioView;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::mappers::map_anuncios_to_frontend;
use crate::notifications::{NotificationCenter, NotificationKind, NotificationOptions};
use crate::storage::{keys, ProposalCounts};

const ALERT_TITLE: &str = "Nova proposta recebida!";
const ALERT_CATEGORY: &str = "proposal";

#[derive(Debug, Clone, Copy)]
pub struct WatcherConfig {
    /// Time between polls.
    pub interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(30) }
    }
}

/// New proposals found on one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProposalsAlert {
    pub anuncio_id: i64,
    pub titulo: String,
    pub novas: usize,
}

impl NewProposalsAlert {
    pub fn message(&self) -> String {
        let plural = if self.novas > 1 { "s" } else { "" };
        format!(
            "Você recebeu {n} nova{plural} proposta{plural} para \"{titulo}\"",
            n = self.novas,
            titulo = self.titulo
        )
    }
}

/// Alerts for listings whose count grew from a non-zero previous count.
///
/// Results are ordered by listing id.
pub fn diff_counts(
    previous: &ProposalCounts,
    current: &ProposalCounts,
    titles: &HashMap<i64, String>,
) -> Vec<NewProposalsAlert> {
    current
        .iter()
        .filter_map(|(&anuncio_id, &now)| {
            let before = previous.get(&anuncio_id).copied().unwrap_or(0);
            (before > 0 && now > before).then(|| NewProposalsAlert {
                anuncio_id,
                titulo: titles.get(&anuncio_id).cloned().unwrap_or_default(),
                novas: now - before,
            })
        })
        .collect()
}

/// Result of one poll.
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    /// Own listings with `propostas` filled in.
    pub anuncios: Vec<AnuncioView>,
    pub alerts: Vec<NewProposalsAlert>,
}

pub struct ProposalWatcher {
    client: Arc<ApiClient>,
    notifications: NotificationCenter,
    config: WatcherConfig,
}

impl ProposalWatcher {
    pub fn new(client: Arc<ApiClient>, notifications: NotificationCenter, config: WatcherConfig) -> Self {
        Self { client, notifications, config }
    }

    /// Run one list-count-diff-notify-persist cycle.
    pub async fn poll_once(&self) -> Result<PollOutcome, ClientError> {
        let state = self.client.session().state();
        let previous = state.get(&keys::PROPOSTAS_CONTADAS).unwrap_or_default();

        let records = self.client.list_meus_anuncios().await?;
        let mut anuncios = map_anuncios_to_frontend(&records);

        let counts =
            join_all(anuncios.iter().map(|a| self.client.count_propostas(a.id))).await;

        let mut current = ProposalCounts::new();
        for (anuncio, count) in anuncios.iter_mut().zip(counts) {
            let count = match count {
                Ok(count) => count,
                Err(e) => {
                    warn!("Failed to count proposals of listing {}: {}", anuncio.id, e);
                    previous.get(&anuncio.id).copied().unwrap_or(0)
                },
            };
            anuncio.propostas = count;
            current.insert(anuncio.id, count);
        }

        let titles: HashMap<i64, String> =
            anuncios.iter().map(|a| (a.id, a.titulo.clone())).collect();
        let alerts = diff_counts(&previous, &current, &titles);
        for alert in &alerts {
            info!("New proposals on listing {}: +{}", alert.anuncio_id, alert.novas);
            let options = NotificationOptions::sticky()
                .with_title(ALERT_TITLE)
                .with_category(ALERT_CATEGORY)
                .with_meta(json!({
                    "anuncio_id": alert.anuncio_id,
                    "anuncio_titulo": alert.titulo,
                }));
            self.notifications.add(alert.message(), NotificationKind::Info, options);
        }

        state.set(&keys::PROPOSTAS_CONTADAS, &current)?;
        Ok(PollOutcome { anuncios, alerts })
    }

    /// Poll now and then every `interval` until `shutdown` turns true.
    ///
    /// Errors of a single poll are logged and do not stop the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(outcome) => debug!(
                            "Proposal poll: {} listings, {} alerts",
                            outcome.anuncios.len(),
                            outcome.alerts.len()
                        ),
                        Err(e) => warn!("Proposal poll failed: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Proposal watcher stopped");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(i64, usize)]) -> ProposalCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_diff_alerts_only_on_growth_from_nonzero() {
        let previous = counts(&[(1, 2), (2, 0), (3, 5), (4, 1)]);
        let current = counts(&[(1, 5), (2, 3), (3, 4), (4, 1), (5, 7)]);
        let titles = HashMap::from([(1, "Pintura".to_string())]);

        let alerts = diff_counts(&previous, &current, &titles);
        assert_eq!(
            alerts,
            vec![NewProposalsAlert { anuncio_id: 1, titulo: "Pintura".to_string(), novas: 3 }]
        );
    }

    #[test]
    fn test_alert_message_plural() {
        let one = NewProposalsAlert { anuncio_id: 1, titulo: "Pintura".to_string(), novas: 1 };
        assert_eq!(one.message(), "Você recebeu 1 nova proposta para \"Pintura\"");
        let many = NewProposalsAlert { novas: 3, ..one };
        assert_eq!(many.message(), "Você recebeu 3 novas propostas para \"Pintura\"");
    }
}
