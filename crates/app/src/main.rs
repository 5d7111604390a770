//! `pokedex`: loads the Pokémon catalogue (local store first, PokéAPI on
//! a cold start), then loads sprites and theme colour for the first entry.

mod config;

use std::sync::Arc;

use anyhow::Context;
use pokedex_core::color::ImageColorAnalyzer;
use pokedex_db::DbPool;
use pokedex_pipeline::detail::{PokemonDetail, SpriteLoader};
use pokedex_pipeline::list::{ListUpdate, PokemonList};
use pokedex_pokeapi::image_loader::ImageLoader;
use pokedex_pokeapi::network::{NetworkService, Server};
use pokedex_pokeapi::service::ApiService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pokedex_app=info,pokedex_pipeline=info,pokedex_pokeapi=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::info!("Pokédex starting");

    // --- Storage ---

    let pool = pokedex_db::create_pool(&config.database_url)
        .await
        .context("Failed to open database")?;
    pokedex_db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    pokedex_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!(database_url = %config.database_url, "Database ready");

    serve(&config, pool).await
}

/// Run the list and detail loads, closing `pool` however they end.
async fn serve(config: &AppConfig, pool: DbPool) -> anyhow::Result<()> {
    let result = run(config, &pool).await;
    pool.close().await;
    result
}

async fn run(config: &AppConfig, pool: &DbPool) -> anyhow::Result<()> {
    // --- List ---

    let server = Server::new(&config.base_url).context("Invalid POKEAPI_BASE_URL")?;
    let network = NetworkService::new(server);
    let base_url = network.server().base_url().to_string();
    let api = ApiService::new(network, config.api);
    tracing::info!(
        base_url = %base_url,
        page_limit = api.config().page_limit,
        detail_concurrency = api.config().detail_concurrency,
        "PokéAPI client ready"
    );
    let list = PokemonList::new(pool.clone(), Arc::new(api));

    let items = match list.request_pokemon().await {
        Ok(ListUpdate::Loaded(items)) => items,
        Ok(ListUpdate::Skipped) => {
            tracing::warn!("List load already in progress");
            return Ok(());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load Pokémon");
            return Err(e.into());
        }
    };
    tracing::info!(count = items.len(), "Pokémon loaded");
    for item in items.iter().take(5) {
        tracing::info!(id = item.id, name = %item.name, types = %item.types, "Pokémon");
    }

    // --- Detail ---

    let Some(first) = items.into_iter().next() else {
        tracing::info!("No Pokémon available");
        return Ok(());
    };

    let images = ImageLoader::new(config.image_cache);
    tracing::debug!(
        capacity_bytes = images.cache().config().capacity_bytes,
        default_ttl_secs = images.cache().config().default_ttl.as_secs(),
        "Image cache ready"
    );
    let sprites = SpriteLoader::new(Arc::new(images), Arc::new(ImageColorAnalyzer::new()));
    let mut detail = PokemonDetail::new(first);
    if !detail.load_sprites_and_color(&sprites).await {
        tracing::warn!(id = detail.pokemon().id, "Sprites unavailable");
        return Ok(());
    }

    if let Some(color) = detail.color() {
        tracing::info!(
            id = detail.pokemon().id,
            name = %detail.pokemon().name,
            color = %color.to_hex(),
            light = color.is_light(),
            has_back = detail.back_image().is_some(),
            "Detail loaded"
        );
    }

    Ok(())
}
