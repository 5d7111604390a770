//! Repository for the `pokemon` table.

use pokedex_core::pokemon::Pokemon;
use pokedex_core::types::PokemonId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::pokemon::PokemonRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, height, weight, moves, types, abilities, stats, \
     front_sprite, back_sprite, cry, created_at, updated_at";

/// Fetch/store operations for persisted Pokémon.
pub struct PokemonRepo;

impl PokemonRepo {
    /// List every stored Pokémon, ordered by id ascending.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Pokemon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pokemon ORDER BY id ASC");
        let rows = sqlx::query_as::<_, PokemonRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Pokemon::from).collect())
    }

    /// Find a single Pokémon by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: PokemonId,
    ) -> Result<Option<Pokemon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pokemon WHERE id = ?1");
        let row = sqlx::query_as::<_, PokemonRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Pokemon::from))
    }

    /// Number of stored rows.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pokemon")
            .fetch_one(pool)
            .await
    }

    /// Insert or replace a batch of Pokémon in one transaction.
    ///
    /// Existing rows keep their `created_at`; `updated_at` is refreshed.
    /// Returns the number of rows written.
    pub async fn upsert_many(pool: &SqlitePool, pokemon: &[Pokemon]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut written = 0;

        for entry in pokemon {
            let result = sqlx::query(
                "INSERT INTO pokemon
                    (id, name, height, weight, moves, types, abilities, stats,
                     front_sprite, back_sprite, cry)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    height = excluded.height,
                    weight = excluded.weight,
                    moves = excluded.moves,
                    types = excluded.types,
                    abilities = excluded.abilities,
                    stats = excluded.stats,
                    front_sprite = excluded.front_sprite,
                    back_sprite = excluded.back_sprite,
                    cry = excluded.cry,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            )
            .bind(entry.id())
            .bind(entry.name())
            .bind(entry.height())
            .bind(entry.weight())
            .bind(Json(entry.moves()))
            .bind(Json(entry.types()))
            .bind(Json(entry.abilities()))
            .bind(Json(entry.stats()))
            .bind(&entry.sprites().front)
            .bind(entry.sprites().back.as_deref())
            .bind(entry.cry())
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(count = pokemon.len(), "Pokémon batch upserted");
        Ok(written)
    }
}
