//! Live network fetching and the timer raced against it.
//!
//! Intercepted requests go out as the page sent them ([`EventFetcher`]).
//! Requests the worker originates itself (precache, push renewal) are built
//! from the router's view and sent through `gloo-net` ([`WebFetcher`]).

use std::cell::RefCell;
use std::time::Duration;

use chapel_core::{FetchError, Fetcher, Request, Response, Timer};
use gloo_net::http::{Method, RequestBuilder};
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::convert::response_from_web;
use super::scope::{self, describe};

/// Fetches worker-originated requests through `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFetcher;

impl Fetcher for WebFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| FetchError::RequestBuild(e.to_string()))?;

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let outgoing = match &request.body {
            Some(body) => builder.body(Uint8Array::from(body.as_slice())),
            None => builder.build(),
        }
        .map_err(|e| FetchError::RequestBuild(e.to_string()))?;

        let response = outgoing
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().entries().collect();
        let body = response.binary().await.map_err(|_| FetchError::BodyRead)?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Fetcher bound to one intercepted request.
///
/// The outbound fetch reuses the page's request object, so mode,
/// credentials, redirect policy and integrity are preserved. The live
/// platform response is kept for [`EventFetcher::take_live`] so the page
/// receives it unconverted (opaque and redirected responses included).
pub struct EventFetcher {
    request: web_sys::Request,
    live: RefCell<Option<web_sys::Response>>,
}

impl EventFetcher {
    pub fn new(request: web_sys::Request) -> Self {
        Self {
            request,
            live: RefCell::new(None),
        }
    }

    /// Fresh copy of the intercepted request to send to the network.
    pub fn outbound(&self) -> Result<web_sys::Request, FetchError> {
        self.request
            .clone()
            .map_err(|e| FetchError::RequestBuild(describe(&e)))
    }

    /// Platform response of the last live fetch, if one completed.
    pub fn take_live(&self) -> Option<web_sys::Response> {
        self.live.borrow_mut().take()
    }
}

impl Fetcher for EventFetcher {
    async fn fetch(&self, _request: &Request) -> Result<Response, FetchError> {
        let scope = scope::global()
            .ok_or_else(|| FetchError::RequestBuild("not running in a service worker".to_string()))?;
        let outbound = self.outbound()?;

        let value = JsFuture::from(scope.fetch_with_request(&outbound))
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;
        let live = value
            .dyn_into::<web_sys::Response>()
            .map_err(|_| FetchError::Network("fetch resolved to a non-response".to_string()))?;

        // Read a copy so the original body stays unread for the page.
        let snapshot = if live.status() == chapel_core::http::OPAQUE_STATUS {
            Response::opaque()
        } else {
            let copy = live.clone().map_err(|_| FetchError::BodyRead)?;
            response_from_web(&copy).await?
        };

        *self.live.borrow_mut() = Some(live);
        Ok(snapshot)
    }
}

/// Delays backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
