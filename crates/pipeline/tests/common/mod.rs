//! Shared fixtures: in-memory storage, a scriptable Pokémon source and a
//! local sprite server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use image::{ImageFormat, Rgba, RgbaImage};
use pokedex_core::pokemon::{NewPokemon, Pokemon, Sprites, Stat};
use pokedex_db::DbPool;
use pokedex_pokeapi::network::NetworkError;
use pokedex_pokeapi::service::PokemonSource;
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

pub async fn memory_pool() -> DbPool {
    let pool = pokedex_db::create_memory_pool().await.unwrap();
    pokedex_db::run_migrations(&pool).await.unwrap();
    pool
}

pub fn pokemon(id: i64, front: &str, back: Option<&str>) -> Pokemon {
    Pokemon::new(NewPokemon {
        id,
        name: format!("poke-{id}"),
        height: id,
        weight: 10 * id,
        moves: vec!["thunder-shock".into()],
        types: vec!["electric".into()],
        abilities: vec!["static".into()],
        stats: vec![Stat {
            name: "hp".into(),
            base_value: 35,
        }],
        sprites: Sprites {
            front: front.to_string(),
            back: back.map(str::to_owned),
        },
        cry: None,
    })
}

pub fn catalogue(ids: &[i64]) -> Vec<Pokemon> {
    ids.iter()
        .map(|id| pokemon(*id, &format!("https://img.example.com/{id}.png"), None))
        .collect()
}

// ---------------------------------------------------------------------------
// Remote source
// ---------------------------------------------------------------------------

/// A [`PokemonSource`] returning a fixed catalogue, or failing with a
/// given status. Optionally parks each call until released.
#[derive(Default)]
pub struct FakeSource {
    pokemon: Vec<Pokemon>,
    fail_status: Option<u16>,
    gated: bool,
    calls: AtomicUsize,
    pub entered: Notify,
    pub release: Notify,
}

impl FakeSource {
    pub fn returning(pokemon: Vec<Pokemon>) -> Self {
        Self {
            pokemon,
            ..Self::default()
        }
    }

    pub fn failing(status_code: u16) -> Self {
        Self {
            fail_status: Some(status_code),
            ..Self::default()
        }
    }

    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PokemonSource for FakeSource {
    async fn request_pokemon(&self) -> Result<Vec<Pokemon>, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        match self.fail_status {
            Some(status_code) => Err(NetworkError::Transport(Box::new(
                NetworkError::RequestFailed { status_code },
            ))),
            None => Ok(self.pokemon.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Sprite server
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SpriteState {
    images: Mutex<HashMap<String, Vec<u8>>>,
    hits: AtomicUsize,
}

/// Serves `GET /sprites/{name}` from an in-memory map; unknown names 404.
pub struct SpriteServer {
    base_url: String,
    state: Arc<SpriteState>,
}

impl SpriteServer {
    pub async fn start() -> Self {
        let state = Arc::new(SpriteState::default());
        let app = Router::new()
            .route("/sprites/{name}", get(serve_sprite))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Publish a solid-colour PNG and return its URL.
    pub fn solid(&self, name: &str, pixel: [u8; 4]) -> String {
        let image = RgbaImage::from_pixel(8, 8, Rgba(pixel));
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        self.state
            .images
            .lock()
            .unwrap()
            .insert(name.to_string(), cursor.into_inner());
        self.url(name)
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/sprites/{name}", self.base_url)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

async fn serve_sprite(State(state): State<Arc<SpriteState>>, Path(name): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.images.lock().unwrap().get(&name).cloned() {
        Some(bytes) => ([(CONTENT_TYPE, "image/png")], bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
