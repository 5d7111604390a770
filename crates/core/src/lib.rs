//! Domain model for the Pokédex client.
//!
//! Holds the [`pokemon::Pokemon`] entity and its wire decoding, the
//! read-only display projection consumed by presentation, and the
//! colour analysis used for theming.

pub mod color;
pub mod display;
pub mod pokemon;
pub mod types;
