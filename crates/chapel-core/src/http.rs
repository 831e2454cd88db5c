//! Request/response values exchanged with the platform.
//!
//! Responses are plain owned values: storing one in a bucket keeps its own
//! copy of the body, so the live response can still be returned to the page.

use std::fmt;

use serde::Serialize;

use crate::url;

/// HTTP request method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Other(String),
}

impl Method {
    /// Parse a method name (case-insensitive).
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Create a bodyless GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Create a POST request carrying `value` as a JSON body.
    pub fn post_json<T: Serialize>(
        url: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Key under which the request is stored in a bucket.
    ///
    /// Returns `None` for anything but GET; only GET responses are cached.
    pub fn cache_key(&self) -> Option<&str> {
        (self.method == Method::Get).then(|| url::without_fragment(&self.url))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Status the platform reports for opaque (cross-origin `no-cors`) responses.
pub const OPAQUE_STATUS: u16 = 0;

/// A response snapshot: live, cached, or synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Cross-origin response whose status, headers and body are hidden.
    pub fn opaque() -> Self {
        Self::new(OPAQUE_STATUS, Vec::new())
    }

    pub fn is_opaque(&self) -> bool {
        self.status == OPAQUE_STATUS
    }

    /// Response with a JSON body and content type.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, serde_json::to_vec(value)?)
            .with_header("Content-Type", "application/json"))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 2xx status, matching the platform's `Response.ok`.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get"), Method::Get);
        assert_eq!(Method::parse("POST"), Method::Post);
        assert_eq!(Method::parse("propfind"), Method::Other("PROPFIND".to_string()));
        assert_eq!(Method::parse("delete").to_string(), "DELETE");
    }

    #[test]
    fn test_cache_key_only_for_get() {
        let get = Request::get("https://chapel.example/events#rsvp");
        assert_eq!(get.cache_key(), Some("https://chapel.example/events"));

        let post = Request::new(Method::Post, "https://chapel.example/api/v1/rsvp");
        assert_eq!(post.cache_key(), None);
    }

    #[test]
    fn test_post_json_sets_content_type() {
        let request =
            Request::post_json("/api/v1/push/subscribe", &serde_json::json!({"endpoint": "x"}))
                .unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(br#"{"endpoint":"x"}"#.as_slice()));
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::new(200, "ok").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(304, "").is_success());
        assert!(!Response::new(503, "").is_success());
    }

    #[test]
    fn test_opaque_response_is_not_success() {
        let opaque = Response::opaque();
        assert!(opaque.is_opaque());
        assert!(!opaque.is_success());
        assert!(!Response::new(200, "").is_opaque());
    }
}
