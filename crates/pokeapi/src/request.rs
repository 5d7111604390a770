//! PokéAPI endpoints and the requests issued against them.

use crate::network::{HttpMethod, ParameterEncoding, Parameters, Requestable};

/// Page size for the list endpoint when none is configured.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// Query parameter names understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKey {
    Limit,
}

impl ParameterKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "limit",
        }
    }
}

/// Backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `pokemon` (paged list).
    Pokemon,
    /// `pokemon/{id-or-slug}`.
    PokemonDetails(String),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Self::Pokemon => "pokemon".to_string(),
            Self::PokemonDetails(id) => format!("pokemon/{id}"),
        }
    }
}

/// Requests for Pokémon data. Both are query-encoded GETs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokemonRequest {
    List { limit: u32 },
    Details(String),
}

impl PokemonRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::List { .. } => Endpoint::Pokemon,
            Self::Details(id) => Endpoint::PokemonDetails(id.clone()),
        }
    }
}

impl Requestable for PokemonRequest {
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn encoding(&self) -> ParameterEncoding {
        ParameterEncoding::Query
    }

    fn path(&self) -> String {
        self.endpoint().path()
    }

    fn parameters(&self) -> Parameters {
        match self {
            Self::List { limit } => {
                Parameters::from([(ParameterKey::Limit.as_str().to_string(), limit.to_string())])
            }
            Self::Details(_) => Parameters::new(),
        }
    }
}
