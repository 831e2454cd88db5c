//! Caching strategies.
//!
//! - network-first: live fetch, write-through on success, fall back to the
//!   bucket, then to an offline terminal. Never fails.
//! - cache-first: bucket hit returns without touching the network; on a
//!   miss, live fetch with write-through, then the precached offline page.
//!
//! Only 2xx live responses are written to a bucket; opaque responses are
//! handed back untouched. Storage failures are
//! logged and treated as a miss or a skipped write.

use std::pin::pin;

use futures_util::future::{Either, select};

use crate::bucket::BucketKind;
use crate::clients::ClientRegistry;
use crate::error::FetchError;
use crate::http::{Request, Response};
use crate::network::{Fetcher, Timer};
use crate::offline;
use crate::route::Route;
use crate::router::{Router, Served};
use crate::storage::{Cache, CacheStorage};

impl<S, F, C, T> Router<S, F, C, T>
where
    S: CacheStorage,
    F: Fetcher,
    C: ClientRegistry,
    T: Timer,
{
    /// Network-first with cache fallback for `route`'s bucket.
    pub async fn network_first(&self, request: &Request, route: Route) -> Served {
        self.network_first_with(request, route, &self.fetcher).await
    }

    /// [`Router::network_first`] going to the network through `fetcher`.
    pub async fn network_first_with<G: Fetcher>(
        &self,
        request: &Request,
        route: Route,
        fetcher: &G,
    ) -> Served {
        let kind = route.bucket().unwrap_or(BucketKind::Dynamic);

        match self.fetch_live_with(request, fetcher).await {
            Ok(response) => {
                if response.is_success() {
                    self.store(kind, request, &response).await;
                }
                return Served::network(response);
            }
            Err(err) => log::debug!("[sw] live fetch of {} failed: {}", request.url, err),
        }

        if let Some(cached) = self.lookup(kind, request).await {
            return Served::cache(cached);
        }

        self.offline_terminal(request, route).await
    }

    /// Cache-first with network refresh for `route`'s bucket.
    ///
    /// Fails only when nothing is cached, the network is unreachable and the
    /// offline page was never precached.
    pub async fn cache_first(&self, request: &Request, route: Route) -> Result<Served, FetchError> {
        self.cache_first_with(request, route, &self.fetcher).await
    }

    /// [`Router::cache_first`] going to the network through `fetcher`.
    pub async fn cache_first_with<G: Fetcher>(
        &self,
        request: &Request,
        route: Route,
        fetcher: &G,
    ) -> Result<Served, FetchError> {
        let kind = route.bucket().unwrap_or(BucketKind::Static);

        if let Some(cached) = self.lookup(kind, request).await {
            return Ok(Served::cache(cached));
        }

        match self.fetch_live_with(request, fetcher).await {
            Ok(response) => {
                if response.is_success() {
                    self.store(kind, request, &response).await;
                }
                Ok(Served::network(response))
            }
            Err(err) => match self.offline_page().await {
                Some(page) => Ok(Served::offline(page)),
                None => Err(err),
            },
        }
    }

    /// Live fetch raced against the configured timeout.
    pub async fn fetch_live(&self, request: &Request) -> Result<Response, FetchError> {
        self.fetch_live_with(request, &self.fetcher).await
    }

    /// Live fetch through `fetcher`, raced against the configured timeout.
    pub async fn fetch_live_with<G: Fetcher>(
        &self,
        request: &Request,
        fetcher: &G,
    ) -> Result<Response, FetchError> {
        let Some(timeout) = self.network_timeout() else {
            return fetcher.fetch(request).await;
        };

        let fetch = pin!(fetcher.fetch(request));
        let expiry = pin!(self.timer.sleep(timeout));

        match select(fetch, expiry).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(FetchError::Timeout),
        }
    }

    /// Terminal response once both network and bucket came up empty.
    async fn offline_terminal(&self, request: &Request, route: Route) -> Served {
        match route {
            Route::Api => Served::offline(offline::api_sentinel()),
            Route::Navigation => {
                if let Some(shell) = self.lookup(BucketKind::Static, request).await {
                    return Served::cache(shell);
                }
                match self.offline_page().await {
                    Some(page) => Served::offline(page),
                    None => Served::offline(offline::text_sentinel()),
                }
            }
            _ => Served::offline(offline::text_sentinel()),
        }
    }

    async fn offline_page(&self) -> Option<Response> {
        let request = Request::get(self.config.offline_url());
        self.lookup(BucketKind::Static, &request).await
    }

    pub(crate) async fn lookup(&self, kind: BucketKind, request: &Request) -> Option<Response> {
        let name = self.buckets.name(kind);
        let cache = match self.storage.open(name).await {
            Ok(cache) => cache,
            Err(err) => {
                log::warn!("[sw] {}", err);
                return None;
            }
        };

        match cache.match_request(request).await {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("[sw] lookup of {} in {} failed: {}", request.url, name, err);
                None
            }
        }
    }

    /// Write a clone of `response`; the caller keeps the original.
    pub(crate) async fn store(&self, kind: BucketKind, request: &Request, response: &Response) {
        let name = self.buckets.name(kind);
        let result = match self.storage.open(name).await {
            Ok(cache) => cache.put(request, response.clone()).await,
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            log::warn!("[sw] not caching {}: {}", request.url, err);
        }
    }
}
