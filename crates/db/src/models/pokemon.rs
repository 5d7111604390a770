//! Row model for the `pokemon` table.

use pokedex_core::pokemon::{NewPokemon, Pokemon, Sprites, Stat};
use pokedex_core::types::{PokemonId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `pokemon` table. List-valued columns are JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct PokemonRow {
    pub id: PokemonId,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub moves: Json<Vec<String>>,
    pub types: Json<Vec<String>>,
    pub abilities: Json<Vec<String>>,
    pub stats: Json<Vec<Stat>>,
    pub front_sprite: String,
    pub back_sprite: Option<String>,
    pub cry: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PokemonRow> for Pokemon {
    fn from(row: PokemonRow) -> Self {
        Pokemon::new(NewPokemon {
            id: row.id,
            name: row.name,
            height: row.height,
            weight: row.weight,
            moves: row.moves.0,
            types: row.types.0,
            abilities: row.abilities.0,
            stats: row.stats.0,
            sprites: Sprites {
                front: row.front_sprite,
                back: row.back_sprite,
            },
            cry: row.cry,
        })
    }
}
