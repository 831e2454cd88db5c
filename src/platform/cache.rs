//! Cache Storage API buckets.

use chapel_core::{Cache, CacheStorage, Request, Response, StorageError};
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::ServiceWorkerGlobalScope;

use super::convert::{response_from_web, response_to_web};
use super::scope::describe;

/// The worker's `caches` object.
#[derive(Clone)]
pub struct WebCacheStorage {
    caches: web_sys::CacheStorage,
}

impl WebCacheStorage {
    pub fn new(scope: &ServiceWorkerGlobalScope) -> Result<Self, StorageError> {
        let caches = scope.caches().map_err(|_| StorageError::Unavailable)?;
        Ok(Self { caches })
    }
}

impl CacheStorage for WebCacheStorage {
    type Cache = WebCache;

    async fn open(&self, name: &str) -> Result<WebCache, StorageError> {
        let cache = JsFuture::from(self.caches.open(name))
            .await
            .map_err(|_| StorageError::OpenFailed(name.to_string()))?;

        let cache = cache
            .dyn_into::<web_sys::Cache>()
            .map_err(|_| StorageError::OpenFailed(name.to_string()))?;

        Ok(WebCache { cache })
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let deleted = JsFuture::from(self.caches.delete(name))
            .await
            .map_err(|_| StorageError::DeleteFailed(name.to_string()))?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let keys = JsFuture::from(self.caches.keys())
            .await
            .map_err(|e| StorageError::Platform(describe(&e)))?;

        Ok(Array::from(&keys)
            .iter()
            .filter_map(|name| name.as_string())
            .collect())
    }
}

/// One open bucket.
#[derive(Clone)]
pub struct WebCache {
    cache: web_sys::Cache,
}

impl Cache for WebCache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, StorageError> {
        let Some(key) = request.cache_key() else {
            return Ok(None);
        };

        let hit = JsFuture::from(self.cache.match_with_str(key))
            .await
            .map_err(|e| StorageError::Platform(describe(&e)))?;

        if hit.is_undefined() || hit.is_null() {
            return Ok(None);
        }

        let response = hit
            .dyn_into::<web_sys::Response>()
            .map_err(|_| StorageError::Platform("cache returned a non-response".to_string()))?;

        response_from_web(&response)
            .await
            .map(Some)
            .map_err(|e| StorageError::Platform(e.to_string()))
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), StorageError> {
        let key = request
            .cache_key()
            .ok_or_else(|| StorageError::UnsupportedMethod(request.method.to_string()))?;

        let response = response_to_web(&response)?;

        JsFuture::from(self.cache.put_with_str(key, &response))
            .await
            .map_err(|_| StorageError::WriteFailed(request.url.clone()))?;
        Ok(())
    }
}
