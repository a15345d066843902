//! Read-state and send bookkeeping for mapped conversations.

use chrono::Utc;
use futures::future::join_all;
use tracing::warn;

use proconect_types::models::payloads::AtualizacaoMensagem;
use proconect_types::models::Direcao;
use proconect_types::{ConversaView, MensagemView};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::mappers::{format_pt_br, map_mensagem_to_frontend};

fn is_unread_received(mensagem: &MensagemView) -> bool {
    mensagem.tipo == Direcao::Recebida && !mensagem.lida && !mensagem.pendente
}

/// Received messages not yet read.
pub fn unread_count(conversa: &ConversaView) -> usize {
    conversa.mensagens.iter().filter(|m| is_unread_received(m)).count()
}

/// Total unread across the inbox.
pub fn total_unread(conversas: &[ConversaView]) -> usize {
    conversas.iter().map(unread_count).sum()
}

/// Mark every unread received message as read.
///
/// Sends one `PATCH /api/mensagens/{id}` per message and flips the local flag
/// of each one the backend accepted. Returns how many were marked; failures
/// are logged and stay unread.
pub async fn mark_conversation_read(client: &ApiClient, conversa: &mut ConversaView) -> usize {
    let ids: Vec<i64> =
        conversa.mensagens.iter().filter(|m| is_unread_received(m)).map(|m| m.id).collect();
    if ids.is_empty() {
        return 0;
    }

    let patch = AtualizacaoMensagem::marcar_lida();
    let results = join_all(ids.iter().map(|&id| {
        let patch = &patch;
        async move { (id, client.atualizar_mensagem(id, patch).await) }
    }))
    .await;

    let mut marked = 0;
    for (id, result) in results {
        match result {
            Ok(_) => {
                if let Some(mensagem) = conversa.mensagens.iter_mut().find(|m| m.id == id) {
                    mensagem.lida = true;
                    marked += 1;
                }
            },
            Err(e) => warn!("Failed to mark message {} as read: {}", id, e),
        }
    }
    marked
}

/// Append `texto` as a pending message, then send it.
///
/// On success the pending entry is replaced by the server copy; on failure
/// it is removed and the error returned.
pub async fn send_message_optimistic(
    client: &ApiClient,
    conversa: &mut ConversaView,
    texto: &str,
) -> Result<MensagemView, ClientError> {
    let now = Utc::now();
    let placeholder_id = -now.timestamp_millis();
    conversa.mensagens.push(MensagemView {
        id: placeholder_id,
        texto: texto.to_string(),
        tipo: Direcao::Enviada,
        data_hora: format_pt_br(now),
        lida: false,
        enviada_em: Some(now),
        pendente: true,
    });

    let sent = client.enviar_mensagem(conversa.id, texto).await;
    let position = conversa.mensagens.iter().position(|m| m.pendente && m.id == placeholder_id);
    match sent {
        Ok(record) => {
            let view = map_mensagem_to_frontend(&record, &record.remetente_id);
            match position {
                Some(index) => conversa.mensagens[index] = view.clone(),
                None => conversa.mensagens.push(view.clone()),
            }
            Ok(view)
        },
        Err(e) => {
            if let Some(index) = position {
                conversa.mensagens.remove(index);
            }
            Err(e)
        },
    }
}
