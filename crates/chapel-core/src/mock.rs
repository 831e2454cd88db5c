//! In-memory collaborators for tests and native tooling.
//!
//! Each fake records what the router did to it so tests can assert on
//! calls as well as results.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;

use crate::clients::{ClientHandle, ClientRegistry};
use crate::error::{ClientError, FetchError, PushError, StorageError};
use crate::http::{Request, Response};
use crate::message::ClientMessage;
use crate::network::{Fetcher, Timer};
use crate::push::PushSubscriber;
use crate::storage::{Cache, CacheStorage};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Cache storage
// =============================================================================

#[derive(Debug, Default)]
struct StorageState {
    buckets: BTreeMap<String, BTreeMap<String, Response>>,
    failing_opens: BTreeSet<String>,
    failing_deletes: BTreeSet<String>,
    writes_fail: bool,
    unavailable: bool,
}

/// Cache storage kept in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStorage {
    state: Arc<Mutex<StorageState>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already contains empty buckets with these names.
    pub fn with_buckets<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let storage = Self::new();
        {
            let mut state = lock(&storage.state);
            for name in names {
                state.buckets.entry(name.into()).or_default();
            }
        }
        storage
    }

    /// Store `response` for a GET of `url` in bucket `name`.
    pub fn seed(&self, name: &str, url: &str, response: Response) {
        lock(&self.state)
            .buckets
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    /// Bucket names in sorted order.
    pub fn bucket_names(&self) -> Vec<String> {
        lock(&self.state).buckets.keys().cloned().collect()
    }

    /// Cached URLs of one bucket in sorted order, `None` if it does not exist.
    pub fn entries(&self, name: &str) -> Option<Vec<String>> {
        lock(&self.state)
            .buckets
            .get(name)
            .map(|bucket| bucket.keys().cloned().collect())
    }

    pub fn entry(&self, name: &str, url: &str) -> Option<Response> {
        lock(&self.state).buckets.get(name)?.get(url).cloned()
    }

    pub fn fail_open(&self, name: &str) {
        lock(&self.state).failing_opens.insert(name.to_string());
    }

    pub fn fail_delete(&self, name: &str) {
        lock(&self.state).failing_deletes.insert(name.to_string());
    }

    pub fn fail_writes(&self) {
        lock(&self.state).writes_fail = true;
    }

    /// Make every operation fail with [`StorageError::Unavailable`].
    pub fn set_unavailable(&self) {
        lock(&self.state).unavailable = true;
    }
}

impl CacheStorage for MemoryCacheStorage {
    type Cache = MemoryCache;

    async fn open(&self, name: &str) -> Result<MemoryCache, StorageError> {
        let mut state = lock(&self.state);
        if state.unavailable {
            return Err(StorageError::Unavailable);
        }
        if state.failing_opens.contains(name) {
            return Err(StorageError::OpenFailed(name.to_string()));
        }
        state.buckets.entry(name.to_string()).or_default();

        Ok(MemoryCache {
            name: name.to_string(),
            state: Arc::clone(&self.state),
        })
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let mut state = lock(&self.state);
        if state.unavailable {
            return Err(StorageError::Unavailable);
        }
        if state.failing_deletes.contains(name) {
            return Err(StorageError::DeleteFailed(name.to_string()));
        }
        Ok(state.buckets.remove(name).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let state = lock(&self.state);
        if state.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(state.buckets.keys().cloned().collect())
    }
}

/// Handle to one bucket of a [`MemoryCacheStorage`].
#[derive(Debug, Clone)]
pub struct MemoryCache {
    name: String,
    state: Arc<Mutex<StorageState>>,
}

impl Cache for MemoryCache {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, StorageError> {
        let Some(key) = request.cache_key() else {
            return Ok(None);
        };
        let state = lock(&self.state);
        Ok(state
            .buckets
            .get(&self.name)
            .and_then(|bucket| bucket.get(key))
            .cloned())
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), StorageError> {
        let key = request
            .cache_key()
            .ok_or_else(|| StorageError::UnsupportedMethod(request.method.to_string()))?;
        let mut state = lock(&self.state);
        if state.writes_fail {
            return Err(StorageError::WriteFailed(request.url.clone()));
        }
        state
            .buckets
            .entry(self.name.clone())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }
}

// =============================================================================
// Network
// =============================================================================

/// Scripted behavior for one URL.
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(Response),
    Fail(FetchError),
    /// Never settles.
    Hang,
}

#[derive(Debug, Default)]
struct FetcherState {
    script: HashMap<String, Scripted>,
    calls: Vec<Request>,
}

/// Fetcher answering from a per-URL script.
///
/// Unscripted URLs fail like an offline browser (`Failed to fetch`).
#[derive(Debug, Clone, Default)]
pub struct ScriptedFetcher {
    state: Arc<Mutex<FetcherState>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: Response) -> &Self {
        self.script(url, Scripted::Respond(response))
    }

    pub fn fail(&self, url: &str, error: FetchError) -> &Self {
        self.script(url, Scripted::Fail(error))
    }

    pub fn hang(&self, url: &str) -> &Self {
        self.script(url, Scripted::Hang)
    }

    fn script(&self, url: &str, behavior: Scripted) -> &Self {
        lock(&self.state).script.insert(url.to_string(), behavior);
        self
    }

    /// Every request seen so far, in order.
    pub fn calls(&self) -> Vec<Request> {
        lock(&self.state).calls.clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.state).calls.len()
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let behavior = {
            let mut state = lock(&self.state);
            state.calls.push(request.clone());
            state.script.get(&request.url).cloned()
        };

        match behavior {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(FetchError::Network("TypeError: Failed to fetch".to_string())),
        }
    }
}

/// Timer whose delays elapse immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTimer;

impl Timer for ImmediateTimer {
    async fn sleep(&self, _duration: Duration) {}
}

/// Timer whose delays never elapse.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTimer;

impl Timer for NeverTimer {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await
    }
}

// =============================================================================
// Clients
// =============================================================================

#[derive(Debug, Default)]
struct ClientsState {
    ids: Vec<String>,
    failing_posts: BTreeSet<String>,
    claim_fails: bool,
    skip_waiting_calls: usize,
    claim_calls: usize,
    posted: Vec<(String, ClientMessage)>,
}

/// Open pages that record every message posted to them.
#[derive(Debug, Clone, Default)]
pub struct RecordingClients {
    state: Arc<Mutex<ClientsState>>,
}

impl RecordingClients {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let clients = Self::default();
        lock(&clients.state).ids = ids.into_iter().map(Into::into).collect();
        clients
    }

    pub fn fail_post(&self, id: &str) {
        lock(&self.state).failing_posts.insert(id.to_string());
    }

    pub fn fail_claim(&self) {
        lock(&self.state).claim_fails = true;
    }

    pub fn skip_waiting_calls(&self) -> usize {
        lock(&self.state).skip_waiting_calls
    }

    pub fn claim_calls(&self) -> usize {
        lock(&self.state).claim_calls
    }

    pub fn posted(&self) -> Vec<(String, ClientMessage)> {
        lock(&self.state).posted.clone()
    }
}

impl ClientRegistry for RecordingClients {
    type Client = RecordingClient;

    async fn skip_waiting(&self) -> Result<(), ClientError> {
        lock(&self.state).skip_waiting_calls += 1;
        Ok(())
    }

    async fn claim(&self) -> Result<(), ClientError> {
        let mut state = lock(&self.state);
        state.claim_calls += 1;
        if state.claim_fails {
            return Err(ClientError::ClaimFailed("InvalidStateError".to_string()));
        }
        Ok(())
    }

    async fn match_all(&self) -> Result<Vec<RecordingClient>, ClientError> {
        let ids = lock(&self.state).ids.clone();
        Ok(ids
            .into_iter()
            .map(|id| RecordingClient {
                id,
                state: Arc::clone(&self.state),
            })
            .collect())
    }
}

/// One page of a [`RecordingClients`].
#[derive(Debug, Clone)]
pub struct RecordingClient {
    id: String,
    state: Arc<Mutex<ClientsState>>,
}

impl ClientHandle for RecordingClient {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn post_message(&self, message: &ClientMessage) -> Result<(), ClientError> {
        let mut state = lock(&self.state);
        if state.failing_posts.contains(&self.id) {
            return Err(ClientError::PostFailed(self.id.clone()));
        }
        state.posted.push((self.id.clone(), message.clone()));
        Ok(())
    }
}

// =============================================================================
// Push
// =============================================================================

/// Subscriber returning a fixed result.
#[derive(Debug, Clone)]
pub struct StaticSubscriber(pub Result<Value, PushError>);

impl PushSubscriber for StaticSubscriber {
    async fn resubscribe(&self) -> Result<Value, PushError> {
        self.0.clone()
    }
}
