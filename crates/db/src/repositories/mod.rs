pub mod pokemon_repo;

pub use pokemon_repo::PokemonRepo;
