use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures::future::join_all;
use proconect_client::mappers::{
    map_anuncio_to_frontend, map_anuncios_to_frontend, map_conversa_to_frontend,
    map_conversas_to_frontend, map_mensagens_to_frontend, map_profissionais_to_frontend,
};
use proconect_client::messaging::{mark_conversation_read, send_message_optimistic, unread_count};
use proconect_client::types::models::payloads::{
    AnuncioQuery, AtualizacaoProposta, NovaProposta, NovoAnuncio, ProfissionalQuery,
};
use proconect_client::types::models::Direcao;
use proconect_client::types::{AnuncioView, ConversaView, PropostaStatus, UsuarioRecord};
use proconect_client::{
    friendly_proposal_error, AnuncioEnricher, ApiClient, ListingFilter, NotificationCenter,
    ProfessionalFilter, ProposalWatcher, WatcherConfig,
};
use tokio::sync::watch as shutdown;
use tracing::{info, warn};

use crate::{AnunciosCmd, ConversasCmd, NovoAnuncioArgs, ProfissionaisCmd, PropostasCmd};

pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<()> {
    client.login(email, password).await?;
    let nome = client.session().current_user().map(|u| u.nome).unwrap_or_default();
    println!("Bem-vindo, {}", if nome.is_empty() { email } else { nome.as_str() });
    Ok(())
}

pub fn logout(client: &ApiClient) -> Result<()> {
    client.session().logout()?;
    println!("Sessão encerrada");
    Ok(())
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    if !client.session().is_authenticated() {
        bail!("Não autenticado. Rode `proconect login`.");
    }
    let me = client.me().await?;
    let nome = me.profile.as_ref().and_then(|p| p.nome.clone()).unwrap_or_default();
    let worker = me.profile.as_ref().and_then(|p| p.is_worker).unwrap_or(false);
    println!("{} {} {}", me.user_id, nome, if worker { "(profissional)" } else { "" });
    Ok(())
}

fn faixa_preco(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("R$ {min:.2} a R$ {max:.2}"),
        (Some(min), None) => format!("a partir de R$ {min:.2}"),
        (None, Some(max)) => format!("até R$ {max:.2}"),
        (None, None) => "a combinar".to_string(),
    }
}

fn print_anuncio(anuncio: &AnuncioView) {
    println!(
        "#{:<5} [{}] {} | {} | {} | por {}",
        anuncio.id,
        anuncio.categoria,
        anuncio.titulo,
        anuncio.localizacao,
        faixa_preco(anuncio.preco_min, anuncio.preco_max),
        anuncio.cliente.nome
    );
}

pub async fn anuncios(client: &ApiClient, cmd: AnunciosCmd) -> Result<()> {
    let enricher = AnuncioEnricher::new();
    match cmd {
        AnunciosCmd::List(filters) => {
            let query = AnuncioQuery {
                tipo: filters.tipo,
                categoria_id: filters.categoria_id,
                busca: filters.busca.clone(),
                urgencia: filters.urgencia,
                order: Some(filters.ordem),
                ..AnuncioQuery::default()
            };
            let records = client.list_anuncios(&query).await?.into_items();
            let mut views = map_anuncios_to_frontend(&records);
            enricher.enrich(client, &mut views).await;

            let local = ListingFilter {
                busca: filters.busca,
                categoria: filters.categoria,
                urgencia: filters.urgencia,
                tipo: filters.tipo,
                order: filters.ordem,
                ..ListingFilter::default()
            };
            let views = local.apply(&views);
            if views.is_empty() {
                println!("Nenhum anúncio encontrado");
            }
            views.iter().for_each(print_anuncio);
        },
        AnunciosCmd::Mine => {
            let records = client.list_meus_anuncios().await?;
            let mut views = map_anuncios_to_frontend(&records);
            let counts = join_all(views.iter().map(|a| client.count_propostas(a.id))).await;
            for (view, count) in views.iter_mut().zip(counts) {
                view.propostas = count.unwrap_or(0);
            }
            for view in &views {
                print_anuncio(view);
                println!("       {} proposta(s), status {}", view.propostas, view.status);
            }
        },
        AnunciosCmd::Show { id } => {
            let record = client.get_anuncio(id).await?;
            let mut views = vec![map_anuncio_to_frontend(&record)];
            enricher.enrich(client, &mut views).await;
            let view = &views[0];
            print_anuncio(view);
            println!("Publicado em {}", view.data_publicacao.format("%d/%m/%Y"));
            if let Some(prazo) = &view.prazo {
                println!("Prazo: {prazo}");
            }
            println!("Urgência: {} | Tipo: {} | Status: {}", view.urgencia, view.tipo, view.status);
            println!();
            println!("{}", view.descricao);
            for requisito in &view.requisitos {
                println!("  - {requisito}");
            }
        },
        AnunciosCmd::Create(args) => {
            let created = client.create_anuncio(&novo_anuncio(args)).await?;
            info!("Listing {} created", created.id);
            println!("Anúncio #{} publicado", created.id);
        },
        AnunciosCmd::Delete { id } => {
            client.delete_anuncio(id).await?;
            println!("Anúncio #{id} removido");
        },
    }
    Ok(())
}

fn novo_anuncio(args: NovoAnuncioArgs) -> NovoAnuncio {
    let mut novo = NovoAnuncio::new(args.titulo, args.descricao, args.categoria_id);
    novo.localizacao = args.localizacao;
    novo.preco_min = args.preco_min;
    novo.preco_max = args.preco_max;
    novo.prazo = args.prazo;
    novo.urgencia = args.urgencia;
    novo.tipo = args.tipo;
    novo.requisitos = args.requisitos;
    novo
}

pub async fn propostas(client: &ApiClient, cmd: PropostasCmd) -> Result<()> {
    match cmd {
        PropostasCmd::List { anuncio, recebidas } => {
            for proposta in client.list_propostas(anuncio, recebidas).await? {
                println!(
                    "#{:<5} anúncio #{} | {} | {}",
                    proposta.id,
                    proposta.anuncio_id,
                    proposta
                        .valor_proposto
                        .map_or_else(|| "sem valor".to_string(), |v| format!("R$ {v:.2}")),
                    proposta.status.unwrap_or_default()
                );
            }
        },
        PropostasCmd::Send { anuncio_id, valor, mensagem } => {
            let payload = NovaProposta { anuncio_id, valor_proposto: valor, mensagem };
            match client.create_proposta(&payload).await {
                Ok(proposta) => println!("Proposta #{} enviada", proposta.id),
                Err(e) => {
                    let failure = friendly_proposal_error(&e);
                    if failure.duplicate {
                        bail!("{} Use `proconect propostas list` para editá-la.", failure.message);
                    }
                    bail!(failure.message);
                },
            }
        },
        PropostasCmd::Withdraw { id } => {
            let changes =
                AtualizacaoProposta { status: Some(PropostaStatus::Retirada), ..Default::default() };
            client.update_proposta(id, &changes).await?;
            println!("Proposta #{id} retirada");
        },
    }
    Ok(())
}

fn current_user_id(client: &ApiClient) -> Result<String> {
    client
        .session()
        .current_user()
        .map(|u| u.id)
        .context("Nenhum usuário logado. Rode `proconect login`.")
}

/// Best-effort lookup of the listed users; failures are skipped.
async fn lookup_users(client: &ApiClient, ids: Vec<String>) -> HashMap<String, UsuarioRecord> {
    join_all(ids.iter().map(|id| client.get_user(id)))
        .await
        .into_iter()
        .filter_map(|result| match result {
            Ok(usuario) => Some((usuario.id.clone(), usuario)),
            Err(e) => {
                warn!("User lookup failed: {}", e);
                None
            },
        })
        .collect()
}

async fn load_conversa(client: &ApiClient, id: i64, me: &str) -> Result<ConversaView> {
    let conversa = client.obter_conversa(id).await?;
    let mensagens = client.list_mensagens(id).await?;
    let outro = lookup_users(client, vec![conversa.other_participant(me).to_string()]).await;
    Ok(map_conversa_to_frontend(
        &conversa,
        outro.values().next(),
        map_mensagens_to_frontend(&mensagens, me),
        me,
    ))
}

fn print_mensagens(conversa: &ConversaView) {
    println!("== {} ==", conversa.nome);
    for mensagem in &conversa.mensagens {
        let autor = match mensagem.tipo {
            Direcao::Enviada => "você",
            Direcao::Recebida => conversa.nome.as_str(),
        };
        println!("[{}] {}: {}", mensagem.data_hora, autor, mensagem.texto);
    }
}

pub async fn conversas(client: &ApiClient, cmd: ConversasCmd) -> Result<()> {
    let me = current_user_id(client)?;
    match cmd {
        ConversasCmd::List => {
            let conversas = client.list_conversas().await?;
            let mut ids: Vec<String> =
                conversas.iter().map(|c| c.other_participant(&me).to_string()).collect();
            ids.sort();
            ids.dedup();
            let usuarios = lookup_users(client, ids).await;

            let mensagens: HashMap<i64, _> = join_all(conversas.iter().map(|c| async move {
                (c.id, client.list_mensagens(c.id).await)
            }))
            .await
            .into_iter()
            .filter_map(|(id, result)| result.ok().map(|m| (id, m)))
            .collect();

            for conversa in map_conversas_to_frontend(&conversas, &usuarios, &mensagens, &me) {
                let ultima = conversa.mensagens.last().map(|m| m.texto.as_str()).unwrap_or_default();
                println!(
                    "#{:<5} {} ({} não lida(s)) {}",
                    conversa.id,
                    conversa.nome,
                    unread_count(&conversa),
                    ultima
                );
            }
        },
        ConversasCmd::Read { id } => {
            let mut conversa = load_conversa(client, id, &me).await?;
            print_mensagens(&conversa);
            let marked = mark_conversation_read(client, &mut conversa).await;
            info!("{} message(s) marked as read", marked);
        },
        ConversasCmd::Send { id, texto } => {
            let mut conversa = load_conversa(client, id, &me).await?;
            let sent = send_message_optimistic(client, &mut conversa, &texto).await?;
            println!("[{}] você: {}", sent.data_hora, sent.texto);
        },
    }
    Ok(())
}

pub async fn profissionais(client: &ApiClient, cmd: ProfissionaisCmd) -> Result<()> {
    let ProfissionaisCmd::List { busca, categoria, localizacao, avaliacao_minima } = cmd;
    let query =
        ProfissionalQuery { busca: busca.clone(), categoria: categoria.clone(), localizacao };
    let usuarios = client.list_profissionais(&query).await?;

    let (avaliacoes, estatisticas) = tokio::join!(
        join_all(usuarios.iter().map(|u| async move {
            (u.id.clone(), client.get_avaliacoes_por_contratado(&u.id).await)
        })),
        join_all(usuarios.iter().map(|u| async move {
            (u.id.clone(), client.get_estatisticas_profissional(&u.id).await)
        })),
    );
    let avaliacoes: HashMap<_, _> =
        avaliacoes.into_iter().filter_map(|(id, r)| r.ok().map(|v| (id, v))).collect();
    let estatisticas: HashMap<_, _> =
        estatisticas.into_iter().filter_map(|(id, r)| r.ok().map(|v| (id, v))).collect();

    let views = map_profissionais_to_frontend(&usuarios, &avaliacoes, &estatisticas);
    let filter = ProfessionalFilter { busca, categoria, avaliacao_minima };
    for profissional in filter.apply(&views) {
        let perfil = &profissional.worker_profile;
        println!(
            "{} | {:.1} ({} avaliações) | {} projeto(s) | {} | {}",
            profissional.nome,
            perfil.avaliacao,
            perfil.total_avaliacoes,
            perfil.projetos_concluidos,
            profissional.cidade.as_deref().unwrap_or("-"),
            perfil.categorias.join(", ")
        );
    }
    Ok(())
}

pub async fn watch(client: Arc<ApiClient>, interval_secs: u64) -> Result<()> {
    if !client.session().is_authenticated() {
        bail!("Não autenticado. Rode `proconect login`.");
    }
    let notifications = NotificationCenter::new();
    let mut alerts = notifications.subscribe();
    tokio::spawn(async move {
        while let Ok(alert) = alerts.recv().await {
            println!("{}: {}", alert.title.as_deref().unwrap_or("Aviso"), alert.message);
        }
    });

    let config = WatcherConfig { interval: Duration::from_secs(interval_secs.max(1)) };
    let watcher = ProposalWatcher::new(client, notifications, config);
    let (tx, rx) = shutdown::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });

    println!("Acompanhando propostas a cada {interval_secs}s (Ctrl-C para sair)");
    watcher.run(rx).await;
    Ok(())
}
