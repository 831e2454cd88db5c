//! Synthetic responses for requests that can be served neither live nor
//! from a bucket.

use serde::Serialize;

use crate::http::Response;

/// Status of every offline sentinel.
pub const OFFLINE_STATUS: u16 = 503;

/// Error envelope returned to API callers while offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfflineEnvelope {
    pub error: &'static str,
    pub message: &'static str,
}

pub const OFFLINE_ENVELOPE: OfflineEnvelope = OfflineEnvelope {
    error: "Offline",
    message: "No internet connection",
};

/// JSON 503 for API requests, so callers parsing JSON get a well-formed error.
pub fn api_sentinel() -> Response {
    Response::json(OFFLINE_STATUS, &OFFLINE_ENVELOPE).unwrap_or_else(|_| {
        Response::new(
            OFFLINE_STATUS,
            r#"{"error":"Offline","message":"No internet connection"}"#,
        )
        .with_header("Content-Type", "application/json")
    })
}

/// Plain-text 503 for everything that is not an API call.
pub fn text_sentinel() -> Response {
    Response::new(OFFLINE_STATUS, "Offline").with_header("Content-Type", "text/plain; charset=utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_sentinel_shape() {
        let response = api_sentinel();
        assert_eq!(response.status, 503);
        assert_eq!(response.header("content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "Offline", "message": "No internet connection"})
        );
    }

    #[test]
    fn test_text_sentinel() {
        let response = text_sentinel();
        assert_eq!(response.status, 503);
        assert_eq!(response.text(), "Offline");
    }
}
