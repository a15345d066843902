use chrono::Utc;

use proconect_types::models::{parse_timestamp, ClienteView, Relation};
use proconect_types::{AnuncioRecord, AnuncioView};

use super::DEFAULT_USER_NAME;

const NO_CATEGORY: &str = "Sem categoria";
const NO_LOCATION: &str = "Localização não informada";

/// Map one listing, filling display defaults.
///
/// The owner is flagged `precisa_buscar` when the backend sent an owner id
/// but no owner name; [`super::AnuncioEnricher`] resolves those.
pub fn map_anuncio_to_frontend(anuncio: &AnuncioRecord) -> AnuncioView {
    let categoria = anuncio
        .categorias
        .as_ref()
        .and_then(Relation::first)
        .and_then(|c| c.nome.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| NO_CATEGORY.to_string());

    let owner = anuncio.owner();
    let owner_id = anuncio.owner_id().map(str::to_string);
    let owner_name = owner.and_then(|u| u.nome.clone()).filter(|n| !n.is_empty());
    let cliente = ClienteView {
        precisa_buscar: owner_name.is_none() && owner_id.is_some(),
        id: owner_id,
        nome: owner_name.unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        foto_url: owner.and_then(|u| u.foto_url.clone()),
        verificado: owner.and_then(|u| u.email_verificado).unwrap_or(false),
        avaliacao: 0.0,
        total_avaliacoes: 0,
    };

    AnuncioView {
        id: anuncio.id,
        titulo: anuncio.titulo.clone().unwrap_or_default(),
        descricao: anuncio.descricao.clone().unwrap_or_default(),
        categoria,
        categoria_id: anuncio.categoria_id,
        localizacao: anuncio
            .localizacao
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| NO_LOCATION.to_string()),
        data_publicacao: anuncio
            .publicado_em
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now),
        prazo: anuncio.prazo.clone().filter(|p| !p.is_empty()),
        urgencia: anuncio.urgencia.unwrap_or_default(),
        tipo: anuncio.tipo.unwrap_or_default(),
        cliente,
        requisitos: anuncio.requisitos.clone().unwrap_or_default(),
        imagens: anuncio.imagens.clone().unwrap_or_default(),
        status: anuncio.status.unwrap_or_default(),
        // zero means "not informed"
        preco_min: anuncio.preco_min.filter(|p| *p != 0.0),
        preco_max: anuncio.preco_max.filter(|p| *p != 0.0),
        visualizacoes: 0,
        propostas: 0,
    }
}

pub fn map_anuncios_to_frontend(anuncios: &[AnuncioRecord]) -> Vec<AnuncioView> {
    anuncios.iter().map(map_anuncio_to_frontend).collect()
}
