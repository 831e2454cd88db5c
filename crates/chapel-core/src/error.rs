//! Error types for the offline cache router.
//!
//! Errors are split by the collaborator that produced them:
//!
//! - [`StorageError`] - cache bucket open/read/write/delete failures
//! - [`FetchError`] - live network fetch failures (including timeouts)
//! - [`ClientError`] - claiming or messaging open pages
//! - [`PushError`] - push re-subscription and server notification
//! - [`ConfigError`], [`VersionError`] - invalid router configuration
//! - [`LifecycleError`] - unrecoverable install/activate failures

use thiserror::Error;

/// Cache storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Cache storage is not available in this context.
    #[error("cache storage not available")]
    Unavailable,
    /// A named bucket could not be opened.
    #[error("failed to open cache '{0}'")]
    OpenFailed(String),
    /// A response could not be written into a bucket.
    #[error("failed to write cache entry for {0}")]
    WriteFailed(String),
    /// A named bucket could not be deleted.
    #[error("failed to delete cache '{0}'")]
    DeleteFailed(String),
    /// Only GET requests can be stored.
    #[error("cannot cache {0} request")]
    UnsupportedMethod(String),
    /// Any other platform rejection.
    #[error("cache storage error: {0}")]
    Platform(String),
}

/// Live network fetch errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network request failed (offline, DNS, CORS, etc.)
    #[error("network error: {0}")]
    Network(String),
    /// Request did not settle before the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// HTTP error response (non-2xx status) where a success was required.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Response body could not be read.
    #[error("failed to read response body")]
    BodyRead,
    /// Platform request object could not be built.
    #[error("failed to build request: {0}")]
    RequestBuild(String),
}

/// Errors raised while talking to open pages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Taking control of open pages failed.
    #[error("failed to claim clients: {0}")]
    ClaimFailed(String),
    /// Enumerating open pages failed.
    #[error("failed to list clients: {0}")]
    MatchFailed(String),
    /// Posting a message to a page failed.
    #[error("failed to post message to client {0}")]
    PostFailed(String),
    /// Skip-waiting request was rejected.
    #[error("skip waiting failed: {0}")]
    SkipWaitingFailed(String),
}

/// Push subscription errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    /// Push manager is not reachable from this registration.
    #[error("push manager unavailable")]
    Unavailable,
    /// Subscribing again was rejected.
    #[error("re-subscribe failed: {0}")]
    SubscribeFailed(String),
    /// The subscription could not be serialized.
    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),
    /// The server could not be notified.
    #[error("failed to notify server: {0}")]
    NotifyFailed(#[from] FetchError),
}

/// Router configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cache prefix must be non-empty and contain no whitespace")]
    InvalidPrefix,
    #[error("api prefix must start with '/': {0}")]
    InvalidApiPrefix(String),
    #[error("precache path must start with '/': {0}")]
    InvalidPrecachePath(String),
    #[error("offline page {0} is not in the precache manifest")]
    OfflinePageNotPrecached(String),
    #[error("origin must be an http(s) URL: {0}")]
    InvalidOrigin(String),
    #[error("invalid static extension list: {0}")]
    InvalidExtensions(String),
}

/// Build version errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version must not be empty")]
    Empty,
    #[error("version must not contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Unrecoverable lifecycle failures.
///
/// Only returned from install/activate/clear; fetch handling never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
