//! Wire records for the paged list endpoint.
//!
//! These only exist to discover per-entity detail endpoints and are
//! never persisted.

use serde::Deserialize;

use crate::network::{parse_request_url, NetworkError};

/// Response body of `GET pokemon?limit=N`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub results: Vec<ListItem>,
}

/// One `{ name, url }` entry of a list page.
#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    pub name: String,
    /// Absolute detail URL, e.g. `https://pokeapi.co/api/v2/pokemon/25/`.
    pub url: String,
}

impl ListItem {
    /// The id (or slug) addressing this entry on the detail endpoint:
    /// the last non-empty path segment of [`ListItem::url`].
    pub fn detail_key(&self) -> Result<String, NetworkError> {
        let url = parse_request_url(&self.url)?;
        url.path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_owned)
            .ok_or_else(|| NetworkError::InvalidUrl(self.url.clone()))
    }
}
