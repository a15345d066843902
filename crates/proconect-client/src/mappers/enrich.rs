use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use parking_lot::Mutex;
use tracing::debug;

use proconect_types::{AnuncioView, UsuarioRecord};

use crate::client::ApiClient;

/// Fills in listing owners the backend did not embed.
///
/// Successful lookups are cached by user id for the lifetime of the
/// enricher; failed lookups leave the defaults in place and are retried on
/// the next call.
#[derive(Debug, Default)]
pub struct AnuncioEnricher {
    cache: Mutex<HashMap<String, UsuarioRecord>>,
}

impl AnuncioEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every view flagged `precisa_buscar`; returns how many were filled.
    pub async fn enrich(&self, client: &ApiClient, views: &mut [AnuncioView]) -> usize {
        let missing: HashSet<String> = {
            let cache = self.cache.lock();
            views
                .iter()
                .filter(|v| v.cliente.precisa_buscar)
                .filter_map(|v| v.cliente.id.clone())
                .filter(|id| !cache.contains_key(id))
                .collect()
        };

        let lookups = missing.into_iter().map(|id| async move {
            let result = client.get_user(&id).await;
            (id, result)
        });
        for (id, result) in join_all(lookups).await {
            match result {
                Ok(usuario) => {
                    self.cache.lock().insert(id, usuario);
                },
                Err(e) => debug!("Owner lookup for {} failed: {}", id, e),
            }
        }

        let cache = self.cache.lock();
        let mut filled = 0;
        for view in views.iter_mut().filter(|v| v.cliente.precisa_buscar) {
            let Some(usuario) = view.cliente.id.as_ref().and_then(|id| cache.get(id)) else {
                continue;
            };
            if let Some(nome) = usuario.nome.clone().filter(|n| !n.is_empty()) {
                view.cliente.nome = nome;
            }
            if usuario.foto_url.is_some() {
                view.cliente.foto_url = usuario.foto_url.clone();
            }
            if let Some(verificado) = usuario.email_verificado {
                view.cliente.verificado = verificado;
            }
            view.cliente.precisa_buscar = false;
            filled += 1;
        }
        filled
    }

    pub fn cached(&self, user_id: &str) -> Option<UsuarioRecord> {
        self.cache.lock().get(user_id).cloned()
    }
}
