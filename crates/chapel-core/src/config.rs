//! Router configuration.
//!
//! Defaults mirror the deployed application; every field can be overridden
//! from TOML or JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::url;

// =============================================================================
// Defaults
// =============================================================================

/// Application prefix used in bucket names.
pub const DEFAULT_PREFIX: &str = "chapel";

/// Path prefix of REST API calls.
pub const DEFAULT_API_PREFIX: &str = "/api/";

/// Critical paths precached on install.
pub const DEFAULT_PRECACHE: &[&str] = &["/", "/index.html", "/manifest.json", "/offline.html"];

/// Fallback document served when a page cannot be loaded.
pub const DEFAULT_OFFLINE_PAGE: &str = "/offline.html";

/// Extensions served cache-first.
pub const DEFAULT_STATIC_EXTENSIONS: &[&str] = &[
    "js", "css", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "woff", "woff2", "ttf", "eot",
];

/// Live fetch timeout in milliseconds.
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 10_000;

/// Endpoint receiving refreshed push subscriptions.
pub const DEFAULT_PUSH_ENDPOINT: &str = "/api/v1/push/subscribe";

// =============================================================================
// RouterConfig
// =============================================================================

/// Everything the router needs besides its version and collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RouterConfig {
    /// Application prefix for bucket names.
    pub prefix: String,
    /// Origin used to resolve root-relative paths (`https://host`).
    ///
    /// Empty means paths are used as-is.
    pub origin: String,
    pub api_prefix: String,
    pub precache: Vec<String>,
    pub offline_page: String,
    pub static_extensions: Vec<String>,
    /// `None` disables the live fetch timeout.
    pub network_timeout_ms: Option<u64>,
    pub push_endpoint: String,
    /// Base64url VAPID key used when no previous push options are known.
    pub vapid_public_key: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            origin: String::new(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            precache: DEFAULT_PRECACHE.iter().map(|p| p.to_string()).collect(),
            offline_page: DEFAULT_OFFLINE_PAGE.to_string(),
            static_extensions: DEFAULT_STATIC_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            network_timeout_ms: Some(DEFAULT_NETWORK_TIMEOUT_MS),
            push_endpoint: DEFAULT_PUSH_ENDPOINT.to_string(),
            vapid_public_key: None,
        }
    }
}

impl RouterConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_precache<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_network_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.network_timeout_ms = timeout_ms;
        self
    }

    /// Check the configuration for values the router cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() || self.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidPrefix);
        }

        if !self.api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidApiPrefix(self.api_prefix.clone()));
        }

        if !self.origin.is_empty() && !url::is_http(&self.origin) {
            return Err(ConfigError::InvalidOrigin(self.origin.clone()));
        }

        if let Some(path) = self.precache.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::InvalidPrecachePath(path.clone()));
        }

        if !self.precache.contains(&self.offline_page) {
            return Err(ConfigError::OfflinePageNotPrecached(
                self.offline_page.clone(),
            ));
        }

        if let Some(ext) = self
            .static_extensions
            .iter()
            .find(|e| e.is_empty() || !e.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(ConfigError::InvalidExtensions(ext.clone()));
        }

        Ok(())
    }

    /// Resolve a root-relative path against the configured origin.
    pub fn resolve(&self, path: &str) -> String {
        if self.origin.is_empty() || url::is_http(path) {
            path.to_string()
        } else {
            format!("{}{}", self.origin, path)
        }
    }

    /// Absolute URL of the offline fallback page.
    pub fn offline_url(&self) -> String {
        self.resolve(&self.offline_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(RouterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RouterConfig::default().with_prefix("");
        assert_eq!(config.validate(), Err(ConfigError::InvalidPrefix));

        let config = RouterConfig {
            api_prefix: "api/".to_string(),
            ..RouterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidApiPrefix(_))
        ));

        let config = RouterConfig::default().with_precache(["/", "index.html", "/offline.html"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPrecachePath(p)) if p == "index.html"
        ));

        let config = RouterConfig::default().with_precache(["/"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OfflinePageNotPrecached(_))
        ));

        let config = RouterConfig::default().with_origin("ftp://chapel.example");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidOrigin(_))));
    }

    #[test]
    fn test_resolve() {
        let config = RouterConfig::default().with_origin("https://chapel.example/");
        assert_eq!(config.resolve("/index.html"), "https://chapel.example/index.html");
        assert_eq!(
            config.resolve("https://cdn.example/a.js"),
            "https://cdn.example/a.js"
        );
        assert_eq!(config.offline_url(), "https://chapel.example/offline.html");

        let bare = RouterConfig::default();
        assert_eq!(bare.resolve("/index.html"), "/index.html");
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"prefix": "app", "network_timeout_ms": null}"#).unwrap();
        assert_eq!(config.prefix, "app");
        assert_eq!(config.network_timeout_ms, None);
        assert_eq!(config.api_prefix, DEFAULT_API_PREFIX);
    }
}
