//! The offline cache router.
//!
//! One [`Router`] is built per worker instance with its version and
//! collaborators injected. Platform events map one-to-one onto its
//! `handle_*` methods; the adapter only translates values.

use std::time::Duration;

use crate::bucket::BucketNames;
use crate::clients::ClientRegistry;
use crate::config::RouterConfig;
use crate::error::{ConfigError, FetchError, LifecycleError};
use crate::http::{Request, Response};
use crate::message::WorkerMessage;
use crate::network::{Fetcher, Timer};
use crate::report::ClearReport;
use crate::route::{Route, RouteClassifier};
use crate::storage::CacheStorage;
use crate::version::Version;

/// Where a response handed back to the page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Cache,
    /// Synthesized or the precached offline page.
    Offline,
}

/// A response plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: Response,
    pub source: Source,
}

impl Served {
    pub fn network(response: Response) -> Self {
        Self {
            response,
            source: Source::Network,
        }
    }

    pub fn cache(response: Response) -> Self {
        Self {
            response,
            source: Source::Cache,
        }
    }

    pub fn offline(response: Response) -> Self {
        Self {
            response,
            source: Source::Offline,
        }
    }
}

/// Result of intercepting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Not handled; the platform's default network path runs.
    Passthrough,
    /// Respond with this response.
    Respond(Served),
    /// Respond with a network error (static asset, offline, nothing cached).
    NetworkError(FetchError),
}

/// What a page message led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    SkippedWaiting,
    Cleared(ClearReport),
    Ignored,
}

/// Offline cache router for one deployed version.
pub struct Router<S, F, C, T> {
    pub(crate) config: RouterConfig,
    pub(crate) version: Version,
    pub(crate) buckets: BucketNames,
    classifier: RouteClassifier,
    pub(crate) storage: S,
    pub(crate) fetcher: F,
    pub(crate) clients: C,
    pub(crate) timer: T,
}

impl<S, F, C, T> Router<S, F, C, T>
where
    S: CacheStorage,
    F: Fetcher,
    C: ClientRegistry,
    T: Timer,
{
    pub fn new(
        config: RouterConfig,
        version: Version,
        storage: S,
        fetcher: F,
        clients: C,
        timer: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = RouteClassifier::new(&config)?;
        let buckets = BucketNames::new(&config.prefix, &version);

        Ok(Self {
            config,
            version,
            buckets,
            classifier,
            storage,
            fetcher,
            clients,
            timer,
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn buckets(&self) -> &BucketNames {
        &self.buckets
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn clients(&self) -> &C {
        &self.clients
    }

    pub(crate) fn network_timeout(&self) -> Option<Duration> {
        self.config.network_timeout_ms.map(Duration::from_millis)
    }

    pub fn classify(&self, request: &Request) -> Route {
        self.classifier.classify(&request.method, &request.url)
    }

    /// Answer an intercepted request. Never fails: every path ends in a
    /// response, a passthrough, or an explicit network error.
    pub async fn handle_fetch(&self, request: &Request) -> Interception {
        self.handle_fetch_with(request, &self.fetcher).await
    }

    /// [`Router::handle_fetch`] with live fetches going through `fetcher`.
    ///
    /// Platforms pass a fetcher bound to the intercepted request so that
    /// its mode, credentials and redirect policy reach the network intact.
    pub async fn handle_fetch_with<G: Fetcher>(&self, request: &Request, fetcher: &G) -> Interception {
        let route = self.classify(request);
        log::debug!("[sw] {} {} -> {}", request.method, request.url, route.as_str());

        match route {
            Route::Skip => Interception::Passthrough,
            Route::StaticAsset => match self.cache_first_with(request, route, fetcher).await {
                Ok(served) => Interception::Respond(served),
                Err(err) => {
                    log::warn!("[sw] {} unavailable offline: {}", request.url, err);
                    Interception::NetworkError(err)
                }
            },
            Route::Api | Route::Navigation | Route::Dynamic => {
                Interception::Respond(self.network_first_with(request, route, fetcher).await)
            }
        }
    }

    /// Handle a command posted by a page.
    pub async fn handle_message(
        &self,
        message: &WorkerMessage,
    ) -> Result<MessageOutcome, LifecycleError> {
        match message {
            WorkerMessage::SkipWaiting => {
                if let Err(err) = self.clients.skip_waiting().await {
                    log::warn!("[sw] skip waiting failed: {}", err);
                }
                Ok(MessageOutcome::SkippedWaiting)
            }
            WorkerMessage::ClearCache => Ok(MessageOutcome::Cleared(self.clear_all().await?)),
            WorkerMessage::Unknown => {
                log::debug!("[sw] ignoring unknown message");
                Ok(MessageOutcome::Ignored)
            }
        }
    }
}
