//! Service worker configuration.
//!
//! Centralizes the constants baked into the deployed worker. The build
//! version comes from `build.rs`; the VAPID key is optional at build time.

use chapel_core::RouterConfig;
use chapel_core::config::{DEFAULT_NETWORK_TIMEOUT_MS, DEFAULT_OFFLINE_PAGE, DEFAULT_PUSH_ENDPOINT};

// =============================================================================
// Build Metadata
// =============================================================================

/// Build version, scoping every cache bucket name.
pub const SW_VERSION: &str = env!("CHAPEL_SW_VERSION");

/// Public VAPID key (base64url) for push re-subscription.
pub const VAPID_PUBLIC_KEY: Option<&str> = option_env!("CHAPEL_VAPID_PUBLIC_KEY");

// =============================================================================
// Cache Configuration
// =============================================================================

/// Prefix of every cache bucket owned by this application.
pub const CACHE_PREFIX: &str = "chapel";

/// App shell precached on install.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    DEFAULT_OFFLINE_PAGE,
];

// =============================================================================
// Network Configuration
// =============================================================================

/// Live fetch timeout in milliseconds before falling back to cache.
pub const FETCH_TIMEOUT_MS: u64 = DEFAULT_NETWORK_TIMEOUT_MS;

/// Server endpoint receiving renewed push subscriptions.
pub const PUSH_SUBSCRIBE_ENDPOINT: &str = DEFAULT_PUSH_ENDPOINT;

// =============================================================================
// Logging
// =============================================================================

/// Most verbose level forwarded to the console.
pub const LOG_LEVEL: log::LevelFilter = if cfg!(debug_assertions) {
    log::LevelFilter::Debug
} else {
    log::LevelFilter::Info
};

/// Router configuration for a worker registered at `origin`.
pub fn router_config(origin: &str) -> RouterConfig {
    RouterConfig {
        vapid_public_key: VAPID_PUBLIC_KEY.map(str::to_string),
        network_timeout_ms: Some(FETCH_TIMEOUT_MS),
        push_endpoint: PUSH_SUBSCRIBE_ENDPOINT.to_string(),
        ..RouterConfig::default()
    }
    .with_prefix(CACHE_PREFIX)
    .with_origin(origin)
    .with_precache(PRECACHE_MANIFEST.iter().copied())
}
