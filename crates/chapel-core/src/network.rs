//! Live network access and timers.

use std::time::Duration;

use crate::error::FetchError;
use crate::http::{Request, Response};

/// Performs live network requests.
///
/// An `Ok` response may carry any status; `Err` means the request never
/// produced a response (offline, DNS failure, aborted).
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Source of delays, raced against live fetches.
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}
