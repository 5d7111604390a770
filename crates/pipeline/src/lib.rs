//! Storage-first data pipeline for the Pokédex.
//!
//! - [`loader`]: the generic storage-first fetch strategy with its
//!   single-flight loading guard.
//! - [`pokemon_loader`]: the concrete strategy over SQLite and the PokéAPI.
//! - [`list`] / [`detail`]: the state surfaces a presentation layer binds to.

pub mod detail;
pub mod error;
pub mod list;
pub mod loader;
pub mod pokemon_loader;
