//! Shared test helpers: a scriptable local HTTP server that records every
//! request it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use image::{ImageFormat, Rgba, RgbaImage};

// ---------------------------------------------------------------------------
// Canned responses
// ---------------------------------------------------------------------------

/// What the stub answers for one path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
}

impl StubResponse {
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: value.to_string().into_bytes(),
            content_type: "application/json",
            cache_control: None,
        }
    }

    pub fn raw(body: &[u8], content_type: &'static str) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            content_type,
            cache_control: None,
        }
    }

    /// A solid-color PNG of the given size.
    pub fn png(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        Self::raw(&png_bytes(width, height, pixel), "image/png")
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            content_type: "text/plain",
            cache_control: None,
        }
    }

    pub fn with_cache_control(mut self, value: &'static str) -> Self {
        self.cache_control = Some(value);
        self
    }
}

/// Encode a solid-color RGBA image as PNG.
pub fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(pixel));
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}

// ---------------------------------------------------------------------------
// Captured traffic
// ---------------------------------------------------------------------------

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    /// Decoded query pairs.
    pub fn query_pairs(&self) -> HashMap<String, String> {
        let Some(query) = &self.query else {
            return HashMap::new();
        };
        reqwest::Url::parse(&format!("http://stub/?{query}"))
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }
}

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<String, StubResponse>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A local HTTP server bound to an ephemeral port. Unknown paths get 404.
pub struct StubServer {
    base_url: String,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

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

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:41234`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` (which should start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Answer `path` with `response` from now on.
    pub fn route(&self, path: &str, response: StubResponse) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn total_hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(CapturedRequest {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: body.to_vec(),
    });

    let canned = state.routes.lock().unwrap().get(&path).cloned();
    let Some(canned) = canned else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(canned.content_type));
    if let Some(cache_control) = canned.cache_control {
        response_headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));
    }

    let status = StatusCode::from_u16(canned.status).unwrap();
    (status, response_headers, canned.body).into_response()
}

// ---------------------------------------------------------------------------
// PokéAPI fixtures
// ---------------------------------------------------------------------------

/// List body whose items point at `{base}/api/pokemon/{id}/`.
pub fn list_body(base_url: &str, ids: &[i64]) -> serde_json::Value {
    let results: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "name": format!("poke-{id}"),
                "url": format!("{base_url}/api/pokemon/{id}/"),
            })
        })
        .collect();
    serde_json::json!({ "count": ids.len(), "results": results })
}

/// Detail body for `id`: height `id`, weight `10 * id`, `moves` moves.
pub fn detail_body(base_url: &str, id: i64, moves: usize) -> serde_json::Value {
    let moves: Vec<serde_json::Value> = (0..moves)
        .map(|n| serde_json::json!({ "move": { "name": format!("move-{n}"), "url": "" } }))
        .collect();
    serde_json::json!({
        "id": id,
        "name": format!("Poke {id}"),
        "height": id,
        "weight": 10 * id,
        "cries": { "latest": format!("{base_url}/cries/{id}.ogg"), "legacy": null },
        "sprites": {
            "front_default": format!("{base_url}/sprites/{id}.png"),
            "back_default": format!("{base_url}/sprites/back/{id}.png"),
        },
        "abilities": [{ "ability": { "name": "static", "url": "" }, "slot": 1 }],
        "moves": moves,
        "types": [{ "slot": 1, "type": { "name": "electric", "url": "" } }],
        "stats": [{ "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } }],
    })
}

/// Route the list at `/api/pokemon` and a detail for every id.
pub fn serve_pokedex(server: &StubServer, ids: &[i64]) {
    server.route(
        "/api/pokemon",
        StubResponse::json(list_body(server.base_url(), ids)),
    );
    for id in ids {
        server.route(
            &format!("/api/pokemon/{id}"),
            StubResponse::json(detail_body(server.base_url(), *id, 1)),
        );
    }
}
