//! Closed vocabularies shared by records, payloads and views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgencia {
    #[default]
    Normal,
    Alta,
}

/// Whether a listing offers a service or asks for one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnuncioTipo {
    Oferta,
    #[default]
    Oportunidade,
}

/// Listing lifecycle status (backend-controlled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnuncioStatus {
    #[default]
    Disponivel,
    Fechado,
    Cancelado,
}

/// Proposal lifecycle status (backend-controlled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropostaStatus {
    #[default]
    Enviada,
    Aceita,
    Recusada,
    Retirada,
}

/// Listing ordering accepted by `/api/anuncios` and by the local filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordem {
    #[default]
    Recentes,
    Antigos,
    MenorPreco,
    MaiorPreco,
}

macro_rules! impl_wire_display {
    ($ty:ty { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire representation used by the backend.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!("valor desconhecido: {other}")),
                }
            }
        }
    };
}

impl_wire_display!(Urgencia { Normal => "normal", Alta => "alta" });
impl_wire_display!(AnuncioTipo { Oferta => "oferta", Oportunidade => "oportunidade" });
impl_wire_display!(AnuncioStatus {
    Disponivel => "disponivel",
    Fechado => "fechado",
    Cancelado => "cancelado",
});
impl_wire_display!(PropostaStatus {
    Enviada => "enviada",
    Aceita => "aceita",
    Recusada => "recusada",
    Retirada => "retirada",
});
impl_wire_display!(Ordem {
    Recentes => "recentes",
    Antigos => "antigos",
    MenorPreco => "menor_preco",
    MaiorPreco => "maior_preco",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Urgencia::Alta).unwrap(), "\"alta\"");
        assert_eq!(serde_json::to_string(&Ordem::MenorPreco).unwrap(), "\"menor_preco\"");
        assert_eq!("Retirada".parse::<PropostaStatus>(), Ok(PropostaStatus::Retirada));
        assert!("urgente".parse::<Urgencia>().is_err());
    }

    #[test]
    fn test_unknown_urgency_is_rejected() {
        assert!(serde_json::from_str::<Urgencia>("\"urgente\"").is_err());
    }
}
