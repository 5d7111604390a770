//! Sprite fetching through the URL-keyed [`ResponseCache`].
//!
//! Failures never propagate: an invalid URL, a non-2xx status, a
//! transport fault or an undecodable body all yield `None` so callers
//! can degrade visually.

use std::sync::Arc;

use image::DynamicImage;
use reqwest::header::CACHE_CONTROL;

use crate::cache::{ResponseCache, ResponseCacheConfig};
use crate::network::parse_request_url;

/// Loads images by URL, hitting the network at most once per URL while
/// the cached response stays fresh.
#[derive(Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
    cache: Arc<ResponseCache>,
}

impl ImageLoader {
    /// Create a loader with its own client and a fresh cache.
    ///
    /// # Arguments
    /// * `config` - Byte capacity and default freshness of the response cache
    pub fn new(config: ResponseCacheConfig) -> Self {
        Self::with_client(reqwest::Client::new(), Arc::new(ResponseCache::new(config)))
    }

    /// Create a loader over an existing client and cache.
    pub fn with_client(client: reqwest::Client, cache: Arc<ResponseCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch and decode the image at `url`.
    ///
    /// A response is cached only once its body has decoded.
    pub async fn load(&self, url: &str) -> Option<DynamicImage> {
        let request_url = match parse_request_url(url) {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::debug!(url, "Not an image URL");
                return None;
            }
        };

        if let Some(body) = self.cache.get(url) {
            tracing::debug!(url, "Image cache hit");
            return decode(url, body).await;
        }

        tracing::debug!(url, "Image cache miss");
        let fetched = self.fetch(request_url).await?;
        let image = decode(url, fetched.bytes.clone()).await?;
        self.cache.store(url, fetched.cache_control.as_deref(), fetched.bytes);
        Some(image)
    }

    // ---- private helpers ----

    async fn fetch(&self, url: reqwest::Url) -> Option<FetchedBody> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Image request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "Image request returned error status"
            );
            return None;
        }

        let cache_control = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        match response.bytes().await {
            Ok(bytes) => Some(FetchedBody {
                bytes: Arc::from(bytes.as_ref()),
                cache_control,
            }),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to read image body");
                None
            }
        }
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(ResponseCacheConfig::default())
    }
}

/// Decode on the blocking pool.
async fn decode(url: &str, body: Arc<[u8]>) -> Option<DynamicImage> {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&body)).await;
    match decoded {
        Ok(Ok(image)) => Some(image),
        Ok(Err(e)) => {
            tracing::warn!(url, error = %e, "Failed to decode image");
            None
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Image decode task failed");
            None
        }
    }
}

struct FetchedBody {
    bytes: Arc<[u8]>,
    cache_control: Option<String>,
}
