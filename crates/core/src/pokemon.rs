//! Pokémon entity and its wire format.
//!
//! The detail endpoint nests most values one or two levels deep
//! (`abilities[].ability.name`, `stats[].stat.name`, ...). [`Pokemon`]
//! flattens those into plain lists on decode and keeps at most
//! [`MAX_MOVES`] moves, in source order.

use serde::{Deserialize, Serialize};

use crate::types::PokemonId;

/// Upper bound on the number of moves kept per entity.
pub const MAX_MOVES: usize = 10;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Front/back sprite URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprites {
    pub front: String,
    pub back: Option<String>,
}

/// A single base stat, e.g. `("hp", 35)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base_value: i64,
}

/// Input for constructing a [`Pokemon`] outside of wire decoding
/// (storage rows, fixtures).
#[derive(Debug, Clone)]
pub struct NewPokemon {
    pub id: PokemonId,
    pub name: String,
    /// Decimetres.
    pub height: i64,
    /// Hectograms.
    pub weight: i64,
    pub moves: Vec<String>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<Stat>,
    pub sprites: Sprites,
    pub cry: Option<String>,
}

/// A fully detailed Pokémon as returned by `pokemon/{id}`.
///
/// Immutable once constructed; every accessor hands out a borrow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PokemonPayload")]
pub struct Pokemon {
    id: PokemonId,
    name: String,
    height: i64,
    weight: i64,
    moves: Vec<String>,
    types: Vec<String>,
    abilities: Vec<String>,
    stats: Vec<Stat>,
    sprites: Sprites,
    cry: Option<String>,
}

impl Pokemon {
    /// Build an entity, truncating `moves` to [`MAX_MOVES`].
    pub fn new(input: NewPokemon) -> Self {
        let mut moves = input.moves;
        moves.truncate(MAX_MOVES);

        Self {
            id: input.id,
            name: input.name,
            height: input.height,
            weight: input.weight,
            moves,
            types: input.types,
            abilities: input.abilities,
            stats: input.stats,
            sprites: input.sprites,
            cry: input.cry,
        }
    }

    pub fn id(&self) -> PokemonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height in decimetres.
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Weight in hectograms.
    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn abilities(&self) -> &[String] {
        &self.abilities
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    /// URL of the latest cry sound, if the API has one.
    pub fn cry(&self) -> Option<&str> {
        self.cry.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PokemonPayload {
    id: PokemonId,
    name: String,
    height: i64,
    weight: i64,
    #[serde(default)]
    cries: Option<CriesPayload>,
    sprites: SpritesPayload,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
    #[serde(default)]
    moves: Vec<MoveSlot>,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    stats: Vec<StatSlot>,
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Deserialize)]
struct CriesPayload {
    latest: Option<String>,
}

#[derive(Deserialize)]
struct SpritesPayload {
    front_default: String,
    back_default: Option<String>,
}

#[derive(Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
}

#[derive(Deserialize)]
struct MoveSlot {
    #[serde(rename = "move")]
    entry: NamedResource,
}

#[derive(Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    entry: NamedResource,
}

#[derive(Deserialize)]
struct StatSlot {
    base_stat: i64,
    stat: NamedResource,
}

impl From<PokemonPayload> for Pokemon {
    fn from(payload: PokemonPayload) -> Self {
        Pokemon::new(NewPokemon {
            id: payload.id,
            name: payload.name,
            height: payload.height,
            weight: payload.weight,
            moves: payload
                .moves
                .into_iter()
                .take(MAX_MOVES)
                .map(|slot| slot.entry.name)
                .collect(),
            types: payload.types.into_iter().map(|slot| slot.entry.name).collect(),
            abilities: payload
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
            stats: payload
                .stats
                .into_iter()
                .map(|slot| Stat {
                    name: slot.stat.name,
                    base_value: slot.base_stat,
                })
                .collect(),
            sprites: Sprites {
                front: payload.sprites.front_default,
                back: payload.sprites.back_default,
            },
            cry: payload.cries.and_then(|cries| cries.latest),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
