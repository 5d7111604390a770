//! Presentation-ready projection of a [`Pokemon`].
//!
//! [`PokemonView`] is rebuilt from the entity whenever the entity
//! changes and is never edited on its own.

use crate::pokemon::Pokemon;
use crate::types::PokemonId;

/// Separator used when joining name lists for display.
const LIST_SEPARATOR: &str = ", ";

/// A base stat formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatView {
    pub name: String,
    pub value: i64,
}

/// Read-only display model for a single Pokémon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonView {
    pub id: PokemonId,
    pub name: String,
    /// e.g. `"0.4 m"`.
    pub height: String,
    /// e.g. `"6.0 kg"`.
    pub weight: String,
    pub types: String,
    pub abilities: String,
    pub moves: String,
    pub stats: Vec<StatView>,
    pub front_sprite: String,
    pub back_sprite: Option<String>,
    pub latest_cry: Option<String>,
}

impl From<&Pokemon> for PokemonView {
    fn from(pokemon: &Pokemon) -> Self {
        Self {
            id: pokemon.id(),
            name: capitalize_words(pokemon.name()),
            height: format_height(pokemon.height()),
            weight: format_weight(pokemon.weight()),
            types: join_capitalized(pokemon.types()),
            abilities: join_capitalized(pokemon.abilities()),
            moves: join_capitalized(pokemon.moves()),
            stats: pokemon
                .stats()
                .iter()
                .map(|stat| StatView {
                    name: capitalize_words(&stat.name),
                    value: stat.base_value,
                })
                .collect(),
            front_sprite: pokemon.sprites().front.clone(),
            back_sprite: pokemon.sprites().back.clone(),
            latest_cry: pokemon.cry().map(str::to_owned),
        }
    }
}

impl From<Pokemon> for PokemonView {
    fn from(pokemon: Pokemon) -> Self {
        Self::from(&pokemon)
    }
}

/// Format a height in decimetres as metres.
pub fn format_height(decimetres: i64) -> String {
    format!("{:.1} m", decimetres as f64 / 10.0)
}

/// Format a weight in hectograms as kilograms.
pub fn format_weight(hectograms: i64) -> String {
    format!("{:.1} kg", hectograms as f64 / 10.0)
}

/// Upper-case the first letter of every space- or hyphen-separated word.
pub fn capitalize_words(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;

    for ch in value.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch == ' ' || ch == '-';
    }

    out
}

fn join_capitalized(values: &[String]) -> String {
    values
        .iter()
        .map(|value| capitalize_words(value))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
