//! Two-phase acquisition of the full Pokémon catalogue.
//!
//! One list call discovers every detail endpoint, then all detail calls
//! run concurrently (bounded by [`ApiConfig::detail_concurrency`]). The
//! combined result is sorted by id regardless of completion order, and
//! the first failing call aborts the whole acquisition.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use pokedex_core::pokemon::Pokemon;

use crate::models::ListResponse;
use crate::network::{NetworkError, NetworkService};
use crate::request::{PokemonRequest, DEFAULT_PAGE_LIMIT};

/// Upper bound on in-flight detail requests when none is configured.
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 16;

/// Tuning knobs for [`ApiService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// `limit` sent to the list endpoint.
    pub page_limit: u32,
    /// Maximum concurrent detail requests. Zero is treated as one.
    pub detail_concurrency: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
        }
    }
}

/// Anything able to produce the complete, id-sorted catalogue.
#[async_trait]
pub trait PokemonSource: Send + Sync {
    async fn request_pokemon(&self) -> Result<Vec<Pokemon>, NetworkError>;
}

/// Domain-level API client built on [`NetworkService`].
#[derive(Debug, Clone)]
pub struct ApiService {
    network: NetworkService,
    config: ApiConfig,
}

impl ApiService {
    /// Create an API client.
    ///
    /// # Arguments
    /// * `network` - Transport bound to the PokéAPI base URL
    /// * `config` - Page limit and detail concurrency
    pub fn new(network: NetworkService, config: ApiConfig) -> Self {
        Self { network, config }
    }

    /// The tuning this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the list, then every listed entity's details.
    ///
    /// Output is ascending by id with duplicate ids collapsed. An empty
    /// list yields an empty result without any detail calls.
    pub async fn request_data(&self) -> Result<Vec<Pokemon>, NetworkError> {
        let list: ListResponse = self
            .network
            .request(&PokemonRequest::List {
                limit: self.config.page_limit,
            })
            .await?;
        tracing::info!(count = list.results.len(), "Fetched Pokémon list");

        let requests = list
            .results
            .iter()
            .map(|item| item.detail_key().map(PokemonRequest::Details))
            .collect::<Result<Vec<_>, _>>()?;

        let mut pokemon: Vec<Pokemon> = futures::stream::iter(requests)
            .map(|request| async move { self.network.request::<Pokemon, _>(&request).await })
            .buffer_unordered(self.config.detail_concurrency.max(1))
            .try_collect()
            .await?;

        pokemon.sort_by_key(Pokemon::id);
        pokemon.dedup_by_key(|entry| entry.id());
        tracing::info!(count = pokemon.len(), "Fetched Pokémon details");

        Ok(pokemon)
    }
}

#[async_trait]
impl PokemonSource for ApiService {
    async fn request_pokemon(&self) -> Result<Vec<Pokemon>, NetworkError> {
        self.request_data().await
    }
}
