//! chapel service worker.
//!
//! Builds one [`chapel_core::Router`] for the deployed version, backed by
//! the browser's Cache Storage, fetch and Clients APIs, and registers it
//! for the worker's lifecycle, fetch, message and push events.

mod config;
mod events;
mod logger;
pub mod platform;

use std::rc::Rc;

use chapel_core::{Router, Version};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use platform::{GlooTimer, WebCacheStorage, WebClients, WebFetcher};

/// Router wired to browser collaborators.
pub type WebRouter = Router<WebCacheStorage, WebFetcher, WebClients, GlooTimer>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logger::init(config::LOG_LEVEL);

    let scope = platform::scope::global()
        .ok_or_else(|| JsValue::from_str("chapel-sw must run in a service worker"))?;

    let origin = platform::scope::origin(&scope).unwrap_or_default();
    let version =
        Version::new(config::SW_VERSION).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let storage = WebCacheStorage::new(&scope).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let router = Router::new(
        config::router_config(&origin),
        version,
        storage,
        WebFetcher,
        WebClients::new(scope.clone()),
        GlooTimer,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    log::info!("[sw] chapel service worker {} loaded", router.version());
    events::register(&scope, Rc::new(router))
}
