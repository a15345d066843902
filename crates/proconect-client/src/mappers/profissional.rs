use std::collections::HashMap;

use proconect_types::models::{
    AvaliacoesResumo, EstatisticasProfissional, PerfilWorkerRecord, PortfolioEntry, PortfolioItem,
    WorkerProfileView,
};
use proconect_types::{ProfissionalView, UsuarioRecord};

use super::DEFAULT_USER_NAME;

fn normalize_portfolio(entries: &[PortfolioEntry]) -> Vec<PortfolioItem> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let fallback_name = format!("Trabalho {}", index + 1);
            match entry {
                PortfolioEntry::Url(url) => PortfolioItem {
                    id: format!("portfolio-{index}"),
                    url: url.clone(),
                    name: fallback_name,
                },
                PortfolioEntry::Item { id, url, name } => {
                    let url = url.clone().unwrap_or_default();
                    let name = name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .or_else(|| {
                            url.rsplit('/').next().filter(|s| !s.is_empty()).map(str::to_string)
                        })
                        .unwrap_or(fallback_name);
                    PortfolioItem {
                        id: id.as_ref().map_or_else(|| format!("portfolio-{index}"), ToString::to_string),
                        url,
                        name,
                    }
                },
            }
        })
        .collect()
}

fn worker_profile(
    perfil: Option<&PerfilWorkerRecord>,
    avaliacoes: Option<&AvaliacoesResumo>,
    estatisticas: Option<&EstatisticasProfissional>,
) -> WorkerProfileView {
    let perfil = perfil.cloned().unwrap_or_default();
    WorkerProfileView {
        avaliacao: avaliacoes.map_or(0.0, |a| a.media),
        total_avaliacoes: avaliacoes.map_or(0, |a| a.total),
        projetos_concluidos: estatisticas.map_or(0, |e| e.projetos_concluidos),
        categorias: perfil.categorias.unwrap_or_default(),
        descricao: perfil.descricao.unwrap_or_default(),
        experiencia: perfil.experiencia.unwrap_or_default(),
        disponibilidade: perfil.disponibilidade.unwrap_or_default(),
        portfolio: normalize_portfolio(perfil.portfolio.as_deref().unwrap_or_default()),
        preco_minimo: perfil.preco_minimo,
        preco_maximo: perfil.preco_maximo,
    }
}

/// Map a professional with optional rating summary and statistics.
pub fn map_profissional_to_frontend(
    usuario: &UsuarioRecord,
    avaliacoes: Option<&AvaliacoesResumo>,
    estatisticas: Option<&EstatisticasProfissional>,
) -> ProfissionalView {
    ProfissionalView {
        id: usuario.id.clone(),
        nome: usuario
            .nome
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        apelido: usuario.apelido.clone().unwrap_or_default(),
        email: usuario.email.clone(),
        telefone: usuario.telefone.clone(),
        foto: usuario.foto_url.clone(),
        cidade: usuario.cidade.clone(),
        estado: usuario.estado.clone(),
        is_worker: usuario.is_worker.unwrap_or(false),
        worker_profile: worker_profile(usuario.perfil_worker.as_ref(), avaliacoes, estatisticas),
    }
}

/// Map a list; lookups are keyed by user id and may be partial.
pub fn map_profissionais_to_frontend(
    usuarios: &[UsuarioRecord],
    avaliacoes: &HashMap<String, AvaliacoesResumo>,
    estatisticas: &HashMap<String, EstatisticasProfissional>,
) -> Vec<ProfissionalView> {
    usuarios
        .iter()
        .map(|u| map_profissional_to_frontend(u, avaliacoes.get(&u.id), estatisticas.get(&u.id)))
        .collect()
}
