/// Stable entity identity as assigned by the remote API.
pub type PokemonId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
