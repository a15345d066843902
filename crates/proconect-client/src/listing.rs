//! Client-side filtering and ordering of mapped views.

use std::cmp::Ordering;

use proconect_types::models::Ordem;
use proconect_types::{AnuncioStatus, AnuncioTipo, AnuncioView, ProfissionalView, Urgencia};

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Normalized search term, `None` when blank.
fn needle(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

/// Missing prices sort last in both directions.
fn cmp_price(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.total_cmp(&b),
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive substring of title or description.
    pub busca: Option<String>,
    /// Category name, case-insensitive.
    pub categoria: Option<String>,
    pub urgencia: Option<Urgencia>,
    pub status: Option<AnuncioStatus>,
    pub tipo: Option<AnuncioTipo>,
    pub order: Ordem,
}

impl ListingFilter {
    pub fn matches(&self, view: &AnuncioView) -> bool {
        if let Some(term) = needle(self.busca.as_deref()) {
            if !contains_folded(&view.titulo, &term) && !contains_folded(&view.descricao, &term) {
                return false;
            }
        }
        if let Some(categoria) = needle(self.categoria.as_deref()) {
            if view.categoria.to_lowercase() != categoria {
                return false;
            }
        }
        self.urgencia.is_none_or(|u| view.urgencia == u)
            && self.status.is_none_or(|s| view.status == s)
            && self.tipo.is_none_or(|t| view.tipo == t)
    }

    /// Matching views in the requested order.
    pub fn apply(&self, views: &[AnuncioView]) -> Vec<AnuncioView> {
        let mut out: Vec<AnuncioView> = views.iter().filter(|v| self.matches(v)).cloned().collect();
        match self.order {
            Ordem::Recentes => out.sort_by(|a, b| b.data_publicacao.cmp(&a.data_publicacao)),
            Ordem::Antigos => out.sort_by(|a, b| a.data_publicacao.cmp(&b.data_publicacao)),
            Ordem::MenorPreco => out.sort_by(|a, b| {
                cmp_price(a.preco_min.or(a.preco_max), b.preco_min.or(b.preco_max), true)
            }),
            Ordem::MaiorPreco => out.sort_by(|a, b| {
                cmp_price(a.preco_max.or(a.preco_min), b.preco_max.or(b.preco_min), false)
            }),
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfessionalFilter {
    /// Substring of name, description, city or any category.
    pub busca: Option<String>,
    pub categoria: Option<String>,
    pub avaliacao_minima: Option<f64>,
}

impl ProfessionalFilter {
    pub fn matches(&self, view: &ProfissionalView) -> bool {
        let profile = &view.worker_profile;
        if let Some(term) = needle(self.busca.as_deref()) {
            let hit = contains_folded(&view.nome, &term)
                || contains_folded(&profile.descricao, &term)
                || view.cidade.as_deref().is_some_and(|c| contains_folded(c, &term))
                || profile.categorias.iter().any(|c| contains_folded(c, &term));
            if !hit {
                return false;
            }
        }
        if let Some(categoria) = needle(self.categoria.as_deref()) {
            if !profile.categorias.iter().any(|c| c.to_lowercase() == categoria) {
                return false;
            }
        }
        self.avaliacao_minima.is_none_or(|min| profile.avaliacao >= min)
    }

    /// Matching views, best rated first.
    pub fn apply(&self, views: &[ProfissionalView]) -> Vec<ProfissionalView> {
        let mut out: Vec<ProfissionalView> =
            views.iter().filter(|v| self.matches(v)).cloned().collect();
        out.sort_by(|a, b| b.worker_profile.avaliacao.total_cmp(&a.worker_profile.avaliacao));
        out
    }
}
