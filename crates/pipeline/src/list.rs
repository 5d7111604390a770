//! The list surface: `{ items, is_loading, request_pokemon }`.

use std::sync::Arc;

use pokedex_core::display::PokemonView;
use pokedex_db::DbPool;
use pokedex_pokeapi::service::PokemonSource;

use crate::error::PipelineError;
use crate::loader::StorageFirstLoader;
use crate::pokemon_loader::PokemonListLoader;

/// Outcome of [`PokemonList::request_pokemon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListUpdate {
    /// Items to display, ascending by id.
    Loaded(Vec<PokemonView>),
    /// Another request was already running; nothing changed.
    Skipped,
}

/// Loads the Pokémon list and tracks whether a load is running.
pub struct PokemonList {
    loader: StorageFirstLoader<PokemonListLoader>,
}

impl PokemonList {
    /// Create a list over the local store and a remote source.
    ///
    /// # Arguments
    /// * `pool` - SQLite pool with migrations applied
    /// * `source` - Remote catalogue, consulted only when the store is empty
    pub fn new(pool: DbPool, source: Arc<dyn PokemonSource>) -> Self {
        Self {
            loader: StorageFirstLoader::new(PokemonListLoader::new(pool, source)),
        }
    }

    /// Whether a load is running.
    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Load the list, or skip if a load is already running.
    pub async fn request_pokemon(&self) -> Result<ListUpdate, PipelineError> {
        let update = match self.loader.load().await? {
            Some(items) => ListUpdate::Loaded(items),
            None => ListUpdate::Skipped,
        };
        Ok(update)
    }
}
