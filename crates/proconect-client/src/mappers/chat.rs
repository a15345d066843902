use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};

use proconect_types::models::{parse_timestamp, Direcao};
use proconect_types::{ConversaRecord, ConversaView, MensagemRecord, MensagemView, UsuarioRecord};

use super::DEFAULT_USER_NAME;

/// Brasília time, which has no DST since 2019.
const BRT_OFFSET_SECS: i32 = -3 * 3600;

/// `dd/mm/yyyy HH:MM:SS` in Brasília time.
pub fn format_pt_br(instant: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(BRT_OFFSET_SECS) {
        Some(offset) => instant.with_timezone(&offset).format("%d/%m/%Y %H:%M:%S").to_string(),
        None => instant.format("%d/%m/%Y %H:%M:%S").to_string(),
    }
}

pub fn map_mensagem_to_frontend(mensagem: &MensagemRecord, current_user_id: &str) -> MensagemView {
    let enviada_em = mensagem.enviada_em.as_deref().and_then(parse_timestamp);
    MensagemView {
        id: mensagem.id,
        texto: mensagem.conteudo.clone().unwrap_or_default(),
        tipo: if mensagem.remetente_id == current_user_id {
            Direcao::Enviada
        } else {
            Direcao::Recebida
        },
        data_hora: enviada_em.map(format_pt_br).unwrap_or_default(),
        lida: mensagem.lida.unwrap_or(false),
        enviada_em,
        pendente: false,
    }
}

pub fn map_mensagens_to_frontend(mensagens: &[MensagemRecord], current_user_id: &str) -> Vec<MensagemView> {
    mensagens.iter().map(|m| map_mensagem_to_frontend(m, current_user_id)).collect()
}

/// Map a conversation given the other participant's row, if known.
pub fn map_conversa_to_frontend(
    conversa: &ConversaRecord,
    outro_usuario: Option<&UsuarioRecord>,
    mensagens: Vec<MensagemView>,
    current_user_id: &str,
) -> ConversaView {
    ConversaView {
        id: conversa.id,
        nome: outro_usuario
            .and_then(|u| u.nome.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        empresa: outro_usuario.and_then(|u| u.apelido.clone()).unwrap_or_default(),
        avatar: outro_usuario.and_then(|u| u.foto_url.clone()).unwrap_or_default(),
        mensagens,
        usuario_id: conversa.other_participant(current_user_id).to_string(),
        criado_em: conversa.criado_em.as_deref().and_then(parse_timestamp),
    }
}

/// Map the inbox, most recent activity first.
///
/// `usuarios` is keyed by user id, `mensagens` by conversation id.
pub fn map_conversas_to_frontend(
    conversas: &[ConversaRecord],
    usuarios: &HashMap<String, UsuarioRecord>,
    mensagens: &HashMap<i64, Vec<MensagemRecord>>,
    current_user_id: &str,
) -> Vec<ConversaView> {
    let mut views: Vec<ConversaView> = conversas
        .iter()
        .map(|conversa| {
            let outro = usuarios.get(conversa.other_participant(current_user_id));
            let msgs = mensagens
                .get(&conversa.id)
                .map(|m| map_mensagens_to_frontend(m, current_user_id))
                .unwrap_or_default();
            map_conversa_to_frontend(conversa, outro, msgs, current_user_id)
        })
        .collect();
    views.sort_by_key(|v| Reverse(v.last_activity()));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mensagem(id: i64, remetente: &str, enviada_em: &str) -> MensagemRecord {
        MensagemRecord {
            id,
            conversa_id: Some(1),
            remetente_id: remetente.to_string(),
            conteudo: Some(format!("msg {id}")),
            lida: None,
            enviada_em: Some(enviada_em.to_string()),
        }
    }

    fn conversa(id: i64, outro: &str, criado_em: Option<&str>) -> ConversaRecord {
        ConversaRecord {
            id,
            usuario_a_id: "me".to_string(),
            usuario_b_id: outro.to_string(),
            criado_em: criado_em.map(str::to_string),
            contexto_tipo: None,
            contexto_id: None,
        }
    }

    #[test]
    fn test_format_pt_br() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 2, 5, 7).unwrap();
        assert_eq!(format_pt_br(instant), "08/03/2024 23:05:07");
    }

    #[test]
    fn test_direction_by_sender() {
        let views = map_mensagens_to_frontend(
            &[mensagem(1, "me", "2024-01-01T12:00:00Z"), mensagem(2, "ana", "2024-01-01T12:01:00Z")],
            "me",
        );
        assert_eq!(views[0].tipo, Direcao::Enviada);
        assert_eq!(views[1].tipo, Direcao::Recebida);
        assert_eq!(views[1].data_hora, "01/01/2024 09:01:00");
        assert!(!views[1].lida);
    }

    #[test]
    fn test_conversas_sorted_by_last_activity() {
        let conversas = vec![
            conversa(1, "ana", Some("2024-01-01T00:00:00Z")),
            conversa(2, "bia", Some("2024-02-01T00:00:00Z")),
            conversa(3, "caio", None),
        ];
        let mut mensagens = HashMap::new();
        mensagens.insert(1, vec![mensagem(10, "ana", "2024-03-01T00:00:00Z")]);
        let mut usuarios = HashMap::new();
        let mut ana = UsuarioRecord::new("ana");
        ana.nome = Some("Ana".to_string());
        ana.apelido = Some("Ana Reformas".to_string());
        usuarios.insert("ana".to_string(), ana);

        let views = map_conversas_to_frontend(&conversas, &usuarios, &mensagens, "me");
        assert_eq!(views.iter().map(|v| v.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(views[0].nome, "Ana");
        assert_eq!(views[0].empresa, "Ana Reformas");
        assert_eq!(views[1].nome, "Usuário");
        assert_eq!(views[1].usuario_id, "bia");
    }
}
