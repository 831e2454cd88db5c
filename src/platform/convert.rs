//! Conversions between platform request/response objects and router values.

use chapel_core::{FetchError, Method, Request, Response, StorageError};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, ResponseInit};

use super::scope::describe;

/// Router view of an intercepted request. Bodies are never read: only GET
/// requests are routed.
pub fn request_from_web(request: &web_sys::Request) -> Request {
    let mut converted = Request::new(Method::parse(&request.method()), request.url());
    converted.headers = header_pairs(&request.headers());
    converted
}

/// Read a platform response fully into a router response.
pub async fn response_from_web(response: &web_sys::Response) -> Result<Response, FetchError> {
    let buffer = response.array_buffer().map_err(|_| FetchError::BodyRead)?;
    let buffer = JsFuture::from(buffer).await.map_err(|_| FetchError::BodyRead)?;
    let body = Uint8Array::new(&buffer).to_vec();

    Ok(Response {
        status: response.status(),
        headers: header_pairs(&response.headers()),
        body,
    })
}

/// Build a platform response from a router response.
///
/// Opaque responses cannot be rebuilt; the platform only hands them out.
pub fn response_to_web(response: &Response) -> Result<web_sys::Response, StorageError> {
    if response.is_opaque() {
        return Err(StorageError::Platform(
            "opaque responses cannot be constructed".to_string(),
        ));
    }

    let headers = Headers::new().map_err(|e| StorageError::Platform(describe(&e)))?;
    for (name, value) in &response.headers {
        headers
            .append(name, value)
            .map_err(|e| StorageError::Platform(describe(&e)))?;
    }

    let init = ResponseInit::new();
    init.set_status(response.status);
    init.set_headers(&headers);

    // Null-body statuses reject any body, even an empty one.
    let bytes = Uint8Array::from(response.body.as_slice());
    let body: Option<&js_sys::Object> = if matches!(response.status, 101 | 204 | 205 | 304) {
        None
    } else {
        Some(bytes.as_ref())
    };

    web_sys::Response::new_with_opt_buffer_source_and_init(body, &init)
        .map_err(|e| StorageError::Platform(describe(&e)))
}

/// `(name, value)` pairs of a Headers object.
pub fn header_pairs(headers: &Headers) -> Vec<(String, String)> {
    let Ok(Some(entries)) = js_sys::try_iter(headers) else {
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let pair = entry.dyn_into::<Array>().ok()?;
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}
