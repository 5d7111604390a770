//! Storage-first loading of the Pokémon catalogue: SQLite first, the
//! PokéAPI on a cold start.

use std::sync::Arc;

use async_trait::async_trait;
use pokedex_core::display::PokemonView;
use pokedex_core::pokemon::Pokemon;
use pokedex_db::repositories::PokemonRepo;
use pokedex_db::DbPool;
use pokedex_pokeapi::service::PokemonSource;

use crate::error::PipelineError;
use crate::loader::DataLoader;

/// [`DataLoader`] over the `pokemon` table and a remote [`PokemonSource`].
#[derive(Clone)]
pub struct PokemonListLoader {
    pool: DbPool,
    source: Arc<dyn PokemonSource>,
}

impl PokemonListLoader {
    pub fn new(pool: DbPool, source: Arc<dyn PokemonSource>) -> Self {
        Self { pool, source }
    }
}

#[async_trait]
impl DataLoader for PokemonListLoader {
    type Stored = Pokemon;
    type Remote = Pokemon;
    type View = PokemonView;
    type Error = PipelineError;

    async fn fetch_stored(&self) -> Result<Vec<Pokemon>, PipelineError> {
        Ok(PokemonRepo::list(&self.pool).await?)
    }

    async fn fetch_remote(&self) -> Result<Vec<Pokemon>, PipelineError> {
        Ok(self.source.request_pokemon().await?)
    }

    async fn store(&self, items: &[Pokemon]) -> Result<(), PipelineError> {
        PokemonRepo::upsert_many(&self.pool, items).await?;
        Ok(())
    }

    fn to_view(&self, item: &Pokemon) -> PokemonView {
        PokemonView::from(item)
    }

    fn to_stored(&self, item: Pokemon) -> Pokemon {
        item
    }
}
