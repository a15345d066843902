//! One method per backend endpoint, grouped by resource.

mod anuncios;
mod auth;
mod categorias;
mod contratacoes;
mod conversas;
mod profissionais;
mod propostas;
mod users;

use crate::error::ClientError;

/// Writes answer with the stored row, which the backend may leave `null`.
pub(crate) fn require_row<T>(path: &str, row: Option<T>) -> Result<T, ClientError> {
    row.ok_or_else(|| ClientError::InvalidResponse {
        path: path.to_string(),
        message: "registro ausente na resposta".to_string(),
    })
}

/// Percent-encode a caller-supplied id for use as one path segment.
pub(crate) fn segment(raw: &str) -> String {
    // form encoding writes spaces as `+` and escapes a literal `+`
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Append `pairs` as a query string; no `?` when there are none.
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    format!("{path}?{}", serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/api/anuncios", &[]), "/api/anuncios");
        assert_eq!(
            with_query("/api/anuncios", &[("busca", "pintura de casa".to_string()), ("page", "2".to_string())]),
            "/api/anuncios?busca=pintura+de+casa&page=2"
        );
    }

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("u-1"), "u-1");
        assert_eq!(segment("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(segment("ana maria+1"), "ana%20maria%2B1");
    }
}
