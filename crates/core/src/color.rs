//! Dominant-colour extraction for sprite theming.
//!
//! [`average_color`] downsamples an image to a small grid and averages
//! its pixels, weighting each by alpha so transparent sprite backgrounds
//! do not pull the result towards black.
//!
//! [`ImageColorAnalyzer`] memoizes results per entity identity. The
//! first image seen for an identity decides its colour for the lifetime
//! of the analyzer; later calls return the cached value even when a
//! different image is passed.

use std::collections::HashMap;

use image::imageops::FilterType;
use image::DynamicImage;
use tokio::sync::RwLock;

use crate::types::PokemonId;

/// Images larger than this (on either side) are downsampled before averaging.
pub const SAMPLE_GRID: u32 = 32;

/// Perceived-brightness threshold above which a colour counts as light.
pub const LIGHT_BRIGHTNESS_THRESHOLD: f32 = 0.7;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// RGBA colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Opaque colour from RGB channels.
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Perceived brightness using the ITU-R BT.601 luma weights.
    pub fn brightness(&self) -> f32 {
        (self.red * 299.0 + self.green * 587.0 + self.blue * 114.0) / 1000.0
    }

    /// Whether dark foreground content reads better on this colour.
    pub fn is_light(&self) -> bool {
        self.brightness() > LIGHT_BRIGHTNESS_THRESHOLD
    }

    /// `#RRGGBB` representation, ignoring alpha.
    pub fn to_hex(&self) -> String {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

// ---------------------------------------------------------------------------
// Pixel analysis
// ---------------------------------------------------------------------------

/// Resize `image` to exactly `width` x `height`.
///
/// Returns `None` when either the source or the target has a zero side.
pub fn resize(image: &DynamicImage, width: u32, height: u32) -> Option<DynamicImage> {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return None;
    }
    Some(image.resize_exact(width, height, FilterType::Triangle))
}

/// Alpha-weighted average colour of `image`.
///
/// Returns `None` for zero-sized or fully transparent images.
pub fn average_color(image: &DynamicImage) -> Option<Color> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }

    let downsampled;
    let source = if image.width() > SAMPLE_GRID || image.height() > SAMPLE_GRID {
        downsampled = resize(
            image,
            image.width().min(SAMPLE_GRID),
            image.height().min(SAMPLE_GRID),
        )?;
        &downsampled
    } else {
        image
    };

    let pixels = source.to_rgba8();
    let (mut red, mut green, mut blue, mut weight) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);

    for pixel in pixels.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = f64::from(a) / 255.0;
        red += f64::from(r) * alpha;
        green += f64::from(g) * alpha;
        blue += f64::from(b) * alpha;
        weight += alpha;
    }

    if weight <= f64::EPSILON {
        return None;
    }

    Some(Color::rgb(
        (red / weight / 255.0) as f32,
        (green / weight / 255.0) as f32,
        (blue / weight / 255.0) as f32,
    ))
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Computes and memoizes one representative colour per entity identity.
#[derive(Debug, Default)]
pub struct ImageColorAnalyzer {
    cache: RwLock<HashMap<PokemonId, Color>>,
}

impl ImageColorAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The colour already computed for `id`, if any.
    pub async fn cached(&self, id: PokemonId) -> Option<Color> {
        self.cache.read().await.get(&id).copied()
    }

    /// Dominant colour for `id`, computed from `image` on first use.
    ///
    /// Subsequent calls with the same `id` return the cached colour and
    /// ignore `image`. Returns `None` when no colour can be extracted;
    /// nothing is cached in that case.
    pub async fn dominant_color(&self, id: PokemonId, image: &DynamicImage) -> Option<Color> {
        if let Some(color) = self.cached(id).await {
            tracing::debug!(pokemon_id = id, "Colour cache hit");
            return Some(color);
        }

        let owned = image.clone();
        let color = match tokio::task::spawn_blocking(move || average_color(&owned)).await {
            Ok(Some(color)) => color,
            Ok(None) => {
                tracing::warn!(pokemon_id = id, "No colour could be extracted from image");
                return None;
            }
            Err(e) => {
                tracing::warn!(pokemon_id = id, error = %e, "Colour extraction task failed");
                return None;
            }
        };

        // Concurrent first calls for one id may both get here; last write wins.
        self.cache.write().await.insert(id, color);
        tracing::debug!(pokemon_id = id, color = %color.to_hex(), "Colour computed");

        Some(color)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
