//! PokéAPI REST client library.
//!
//! Provides a generic JSON transport, the PokéAPI endpoint and request
//! definitions, the two-phase list/detail [`service::ApiService`], and a
//! sprite [`image_loader::ImageLoader`] backed by a URL-keyed HTTP
//! response cache.

pub mod cache;
pub mod image_loader;
pub mod models;
pub mod network;
pub mod request;
pub mod service;
