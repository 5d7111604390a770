use pokedex_pokeapi::network::NetworkError;

/// Failure of a storage-first load.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading or writing the local store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Fetching from the remote API failed.
    #[error("Remote error: {0}")]
    Remote(#[from] NetworkError),
}
