//! The detail surface: sprites, theme colour and flip state for one
//! Pokémon.
//!
//! Loading is split from state so the (slow) sprite fetch can run without
//! holding the detail state: [`SpriteLoader::load`] produces a
//! [`SpriteSet`], and [`PokemonDetail::apply`] installs it only if it
//! still belongs to the displayed Pokémon.

use std::sync::Arc;

use image::DynamicImage;
use pokedex_core::color::{Color, ImageColorAnalyzer};
use pokedex_core::display::PokemonView;
use pokedex_core::types::PokemonId;
use pokedex_pokeapi::image_loader::ImageLoader;

/// Everything a detail screen needs besides the view model itself.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub pokemon_id: PokemonId,
    pub front: DynamicImage,
    pub back: Option<DynamicImage>,
    pub color: Color,
}

/// Loads sprites and derives the theme colour from the front sprite.
#[derive(Clone)]
pub struct SpriteLoader {
    images: Arc<ImageLoader>,
    colors: Arc<ImageColorAnalyzer>,
}

impl SpriteLoader {
    pub fn new(images: Arc<ImageLoader>, colors: Arc<ImageColorAnalyzer>) -> Self {
        Self { images, colors }
    }

    /// Front sprite and colour are required: if either is unavailable the
    /// whole load yields `None`. The back sprite is optional and only
    /// requested when the Pokémon has one.
    pub async fn load(&self, pokemon: &PokemonView) -> Option<SpriteSet> {
        let Some(front) = self.images.load(&pokemon.front_sprite).await else {
            tracing::warn!(pokemon_id = pokemon.id, "Front sprite unavailable");
            return None;
        };
        let Some(color) = self.colors.dominant_color(pokemon.id, &front).await else {
            tracing::warn!(pokemon_id = pokemon.id, "No colour for front sprite");
            return None;
        };

        let back = match &pokemon.back_sprite {
            Some(url) => self.images.load(url).await,
            None => None,
        };

        Some(SpriteSet {
            pokemon_id: pokemon.id,
            front,
            back,
            color,
        })
    }
}

/// Detail state for one Pokémon.
#[derive(Debug, Clone)]
pub struct PokemonDetail {
    pokemon: PokemonView,
    is_flipped: bool,
    front_image: Option<DynamicImage>,
    back_image: Option<DynamicImage>,
    color: Option<Color>,
}

impl PokemonDetail {
    pub fn new(pokemon: PokemonView) -> Self {
        Self {
            pokemon,
            is_flipped: false,
            front_image: None,
            back_image: None,
            color: None,
        }
    }

    pub fn pokemon(&self) -> &PokemonView {
        &self.pokemon
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn front_image(&self) -> Option<&DynamicImage> {
        self.front_image.as_ref()
    }

    pub fn back_image(&self) -> Option<&DynamicImage> {
        self.back_image.as_ref()
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Show the back sprite. Returns `false` if already flipped.
    pub fn flip(&mut self) -> bool {
        if self.is_flipped {
            return false;
        }
        self.is_flipped = true;
        true
    }

    /// Show the front sprite again. Returns `false` if not flipped.
    pub fn flip_back(&mut self) -> bool {
        if !self.is_flipped {
            return false;
        }
        self.is_flipped = false;
        true
    }

    /// Install loaded sprites. Sets for a different Pokémon are stale and
    /// are dropped, returning `false`.
    pub fn apply(&mut self, sprites: SpriteSet) -> bool {
        if sprites.pokemon_id != self.pokemon.id {
            tracing::debug!(
                expected = self.pokemon.id,
                received = sprites.pokemon_id,
                "Dropping stale sprite set"
            );
            return false;
        }

        self.front_image = Some(sprites.front);
        self.back_image = sprites.back;
        self.color = Some(sprites.color);
        true
    }

    /// Load sprites through `loader` and apply them.
    pub async fn load_sprites_and_color(&mut self, loader: &SpriteLoader) -> bool {
        match loader.load(&self.pokemon).await {
            Some(sprites) => self.apply(sprites),
            None => false,
        }
    }
}
