use std::str::FromStr;
use std::time::Duration;

use pokedex_pokeapi::cache::{ResponseCacheConfig, DEFAULT_CAPACITY_BYTES, DEFAULT_TTL};
use pokedex_pokeapi::request::DEFAULT_PAGE_LIMIT;
use pokedex_pokeapi::service::{ApiConfig, DEFAULT_DETAIL_CONCURRENCY};

const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";
const DEFAULT_DATABASE_URL: &str = "sqlite://pokedex.db?mode=rwc";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime configuration for the `pokedex` binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PokéAPI base URL every request path is appended to.
    pub base_url: String,
    /// SQLite connection string for the local record store.
    pub database_url: String,
    pub api: ApiConfig,
    pub image_cache: ResponseCacheConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                         |
    /// |--------------------------------|---------------------------------|
    /// | `POKEAPI_BASE_URL`             | `https://pokeapi.co/api/v2/`    |
    /// | `POKEDEX_DATABASE_URL`         | `sqlite://pokedex.db?mode=rwc`  |
    /// | `POKEAPI_PAGE_LIMIT`           | `1000`                          |
    /// | `POKEAPI_DETAIL_CONCURRENCY`   | `16`                            |
    /// | `IMAGE_CACHE_CAPACITY_BYTES`   | `10000000`                      |
    /// | `IMAGE_CACHE_DEFAULT_TTL_SECS` | `3600`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("POKEAPI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let database_url =
            lookup("POKEDEX_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let api = ApiConfig {
            page_limit: parse_var(&lookup, "POKEAPI_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)?,
            detail_concurrency: parse_var(
                &lookup,
                "POKEAPI_DETAIL_CONCURRENCY",
                DEFAULT_DETAIL_CONCURRENCY,
            )?,
        };

        let image_cache = ResponseCacheConfig {
            capacity_bytes: parse_var(
                &lookup,
                "IMAGE_CACHE_CAPACITY_BYTES",
                DEFAULT_CAPACITY_BYTES,
            )?,
            default_ttl: Duration::from_secs(parse_var(
                &lookup,
                "IMAGE_CACHE_DEFAULT_TTL_SECS",
                DEFAULT_TTL.as_secs(),
            )?),
        };

        Ok(Self {
            base_url,
            database_url,
            api,
            image_cache,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
