//! In-memory HTTP response cache keyed by exact URL.
//!
//! Bodies are weighed by size against a byte capacity (Moka TinyLFU
//! admission handles eviction). Each entry lives for the freshness its
//! `Cache-Control` header grants, or the configured default when the
//! header says nothing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;

/// Capacity when none is configured (10 MB).
pub const DEFAULT_CAPACITY_BYTES: u64 = 10_000_000;

/// Freshness for responses that carry no caching directives.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Upper bound on any server-granted `max-age`.
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Sizing and freshness defaults for [`ResponseCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCacheConfig {
    pub capacity_bytes: u64,
    pub default_ttl: Duration,
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            default_ttl: DEFAULT_TTL,
        }
    }
}

// ---------------------------------------------------------------------------
// Cache-Control
// ---------------------------------------------------------------------------

/// What a response's `Cache-Control` header allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Must not be stored (`no-store`, `no-cache`, `max-age=0`).
    NoStore,
    /// Fresh for the given duration.
    MaxAge(Duration),
    /// No usable directive.
    Unspecified,
}

/// Interpret a `Cache-Control` header value.
///
/// `no-store` and `no-cache` win over any `max-age`. Unknown or
/// malformed directives are ignored.
pub fn parse_cache_control(header: Option<&str>) -> Freshness {
    let Some(header) = header else {
        return Freshness::Unspecified;
    };

    let mut freshness = Freshness::Unspecified;
    for directive in header.split(',').map(|d| d.trim().to_ascii_lowercase()) {
        match directive.as_str() {
            "no-store" | "no-cache" => return Freshness::NoStore,
            _ => {
                let seconds = directive
                    .strip_prefix("max-age=")
                    .and_then(|v| v.trim_matches('"').parse::<u64>().ok());
                match seconds {
                    Some(0) => freshness = Freshness::NoStore,
                    Some(secs) => freshness = Freshness::MaxAge(Duration::from_secs(secs)),
                    None => {}
                }
            }
        }
    }
    freshness
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct CachedResponse {
    body: Arc<[u8]>,
    ttl: Duration,
}

/// Per-entry expiry: each response carries its own time to live.
struct ResponseExpiry;

impl Expiry<String, CachedResponse> for ResponseExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedResponse,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// URL-keyed store of raw response bodies.
pub struct ResponseCache {
    inner: Cache<String, CachedResponse>,
    config: ResponseCacheConfig,
}

impl ResponseCache {
    pub fn new(config: ResponseCacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.capacity_bytes)
            .weigher(|url: &String, response: &CachedResponse| {
                u32::try_from(url.len() + response.body.len()).unwrap_or(u32::MAX)
            })
            .expire_after(ResponseExpiry)
            .build();
        Self { inner, config }
    }

    /// Capacity and default TTL in effect.
    pub fn config(&self) -> &ResponseCacheConfig {
        &self.config
    }

    /// The fresh body stored for `url`, if any.
    pub fn get(&self, url: &str) -> Option<Arc<[u8]>> {
        self.inner.get(url).map(|response| response.body)
    }

    /// Store `body` for `url` according to its `Cache-Control` header.
    ///
    /// Returns whether the body was stored. Non-storable responses and
    /// bodies larger than the whole cache are skipped.
    pub fn store(&self, url: &str, cache_control: Option<&str>, body: Arc<[u8]>) -> bool {
        let ttl = match parse_cache_control(cache_control) {
            Freshness::NoStore => return false,
            Freshness::MaxAge(age) => age.min(MAX_TTL),
            Freshness::Unspecified => self.config.default_ttl,
        };

        let weight = (url.len() + body.len()) as u64;
        if weight > self.config.capacity_bytes {
            tracing::debug!(url, weight, "Response too large to cache");
            return false;
        }

        self.inner.insert(url.to_string(), CachedResponse { body, ttl });
        true
    }

    /// Drop the entry for `url`.
    pub fn invalidate(&self, url: &str) {
        self.inner.invalidate(url);
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(ResponseCacheConfig::default())
    }
}
