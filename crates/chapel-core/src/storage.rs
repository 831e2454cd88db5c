//! Cache storage abstraction.
//!
//! Mirrors the subset of the platform Cache Storage API the router uses:
//! named buckets that can be opened, listed and deleted, each holding
//! request/response pairs keyed by GET URL. The platform guarantees atomic
//! per-key put/get; concurrent writers to one key are last-write-wins.

use crate::error::StorageError;
use crate::http::{Request, Response};

/// All named buckets visible to this origin.
#[allow(async_fn_in_trait)]
pub trait CacheStorage {
    type Cache: Cache;

    /// Open a bucket, creating it if it does not exist.
    async fn open(&self, name: &str) -> Result<Self::Cache, StorageError>;

    /// Delete a bucket. `Ok(false)` if there was nothing to delete.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Names of every existing bucket.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// One open bucket.
#[allow(async_fn_in_trait)]
pub trait Cache {
    /// Stored response for a GET request, if any.
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, StorageError>;

    /// Store a response snapshot. Non-GET requests are rejected.
    async fn put(&self, request: &Request, response: Response) -> Result<(), StorageError>;
}
