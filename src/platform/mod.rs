//! Browser bindings for the router's collaborators.
//!
//! Provides:
//! - [`WebCacheStorage`] - Cache Storage API buckets
//! - [`EventFetcher`], [`WebFetcher`], [`GlooTimer`] - live fetches and their timeout
//! - [`WebClients`] - skip-waiting, claiming and messaging pages
//! - [`WebPushSubscriber`] - push re-subscription

mod cache;
pub mod convert;
mod clients;
mod fetch;
mod push;
pub mod scope;

pub use cache::{WebCache, WebCacheStorage};
pub use clients::{WebClient, WebClients};
pub use fetch::{EventFetcher, GlooTimer, WebFetcher};
pub use push::{WebPushSubscriber, decode_vapid_key};
