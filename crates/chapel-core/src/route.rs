//! Request classification.
//!
//! Every intercepted request maps to exactly one [`Route`]. Checks run in a
//! fixed order: method/scheme exclusion, API prefix, navigation heuristic,
//! static extension, then the dynamic default. An API path ending in `.json`
//! is therefore `Api`, never `StaticAsset`.

use regex::Regex;

use crate::bucket::BucketKind;
use crate::config::RouterConfig;
use crate::error::ConfigError;
use crate::http::Method;
use crate::url;

/// Where an intercepted request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not cacheable (non-GET or non-http(s)); leave it to the platform.
    Skip,
    /// REST API call: network-first against the api bucket.
    Api,
    /// HTML document: network-first against the dynamic bucket.
    Navigation,
    /// Script, stylesheet, image, icon or font: cache-first.
    StaticAsset,
    /// Anything else: network-first against the dynamic bucket.
    Dynamic,
}

impl Route {
    /// Bucket the route reads and writes, `None` for [`Route::Skip`].
    pub fn bucket(self) -> Option<BucketKind> {
        match self {
            Self::Skip => None,
            Self::Api => Some(BucketKind::Api),
            Self::Navigation | Self::Dynamic => Some(BucketKind::Dynamic),
            Self::StaticAsset => Some(BucketKind::Static),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Api => "api",
            Self::Navigation => "navigation",
            Self::StaticAsset => "static-asset",
            Self::Dynamic => "dynamic",
        }
    }
}

/// Pure classifier built once from the router configuration.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    api_prefix: String,
    static_pattern: Regex,
}

impl RouteClassifier {
    pub fn new(config: &RouterConfig) -> Result<Self, ConfigError> {
        if config.static_extensions.is_empty() {
            return Err(ConfigError::InvalidExtensions("empty".to_string()));
        }

        let alternatives = config
            .static_extensions
            .iter()
            .map(|ext| regex::escape(&ext.to_ascii_lowercase()))
            .collect::<Vec<_>>()
            .join("|");
        let static_pattern = Regex::new(&format!(r"\.(?:{})$", alternatives))
            .map_err(|e| ConfigError::InvalidExtensions(e.to_string()))?;

        Ok(Self {
            api_prefix: config.api_prefix.clone(),
            static_pattern,
        })
    }

    /// Classify a request. Same input, same route.
    pub fn classify(&self, method: &Method, request_url: &str) -> Route {
        if *method != Method::Get || !url::is_http(request_url) {
            return Route::Skip;
        }

        let path = url::path(request_url);

        if path.starts_with(&self.api_prefix) {
            return Route::Api;
        }

        if is_navigation(path) {
            return Route::Navigation;
        }

        if self.static_pattern.is_match(&path.to_ascii_lowercase()) {
            return Route::StaticAsset;
        }

        Route::Dynamic
    }
}

/// Looks like an HTML document request.
fn is_navigation(path: &str) -> bool {
    if path == "/" {
        return true;
    }

    match url::extension(path) {
        None => true,
        Some(ext) => ext == "html",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RouteClassifier {
        RouteClassifier::new(&RouterConfig::default()).unwrap()
    }

    fn get(url: &str) -> Route {
        classifier().classify(&Method::Get, url)
    }

    #[test]
    fn test_skip_non_get_and_non_http() {
        let classifier = classifier();
        for method in [Method::Post, Method::Put, Method::Delete, Method::Head] {
            assert_eq!(
                classifier.classify(&method, "https://chapel.example/api/v1/events"),
                Route::Skip
            );
        }
        assert_eq!(get("chrome-extension://abc/content.js"), Route::Skip);
        assert_eq!(get("data:image/png;base64,AAAA"), Route::Skip);
    }

    #[test]
    fn test_api_wins_over_extension() {
        assert_eq!(get("https://chapel.example/api/v1/x"), Route::Api);
        assert_eq!(get("https://chapel.example/api/v1/events.json"), Route::Api);
        assert_eq!(get("https://chapel.example/api/v1/avatar.png"), Route::Api);
        assert_eq!(get("https://chapel.example/api/v1/members?q=a.js"), Route::Api);
    }

    #[test]
    fn test_navigation() {
        assert_eq!(get("https://chapel.example/"), Route::Navigation);
        assert_eq!(get("https://chapel.example"), Route::Navigation);
        assert_eq!(get("https://chapel.example/events/42"), Route::Navigation);
        assert_eq!(get("https://chapel.example/index.html"), Route::Navigation);
        assert_eq!(get("https://chapel.example/about.HTML"), Route::Navigation);
    }

    #[test]
    fn test_static_assets() {
        assert_eq!(get("https://chapel.example/main.abc123.js"), Route::StaticAsset);
        assert_eq!(get("https://chapel.example/styles/app.css?v=3"), Route::StaticAsset);
        assert_eq!(get("https://chapel.example/icons/favicon.ico"), Route::StaticAsset);
        assert_eq!(get("https://chapel.example/fonts/inter.woff2"), Route::StaticAsset);
        assert_eq!(get("https://chapel.example/img/LOGO.PNG"), Route::StaticAsset);
    }

    #[test]
    fn test_dynamic_default() {
        assert_eq!(get("https://chapel.example/manifest.json"), Route::Dynamic);
        assert_eq!(get("https://chapel.example/bulletin.pdf"), Route::Dynamic);
        assert_eq!(get("https://chapel.example/main.js.map"), Route::Dynamic);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = classifier();
        let urls = [
            "https://chapel.example/",
            "https://chapel.example/api/v1/x",
            "https://chapel.example/main.abc123.js",
            "https://chapel.example/manifest.json",
        ];
        for url in urls {
            let first = classifier.classify(&Method::Get, url);
            for _ in 0..3 {
                assert_eq!(classifier.classify(&Method::Get, url), first);
            }
        }
    }

    #[test]
    fn test_route_buckets() {
        assert_eq!(Route::Skip.bucket(), None);
        assert_eq!(Route::Api.bucket(), Some(BucketKind::Api));
        assert_eq!(Route::Navigation.bucket(), Some(BucketKind::Dynamic));
        assert_eq!(Route::StaticAsset.bucket(), Some(BucketKind::Static));
        assert_eq!(Route::Dynamic.bucket(), Some(BucketKind::Dynamic));
    }

    #[test]
    fn test_custom_api_prefix() {
        let config = RouterConfig {
            api_prefix: "/graphql".to_string(),
            ..RouterConfig::default()
        };
        let classifier = RouteClassifier::new(&config).unwrap();
        assert_eq!(
            classifier.classify(&Method::Get, "https://chapel.example/graphql?q=1"),
            Route::Api
        );
        assert_eq!(
            classifier.classify(&Method::Get, "https://chapel.example/api/v1/x"),
            Route::Navigation
        );
    }
}
