//! Install, activate and manual clear.
//!
//! Per-item failures (one manifest path, one bucket, one page) are logged
//! and recorded, never fatal. Only storage being unusable as a whole fails
//! the lifecycle step, leaving retry policy to the platform.

use futures_util::future::{join, join_all};

use crate::bucket::BucketKind;
use crate::clients::{ClientHandle, ClientRegistry};
use crate::error::{FetchError, LifecycleError, StorageError};
use crate::http::Request;
use crate::message::ClientMessage;
use crate::network::{Fetcher, Timer};
use crate::report::{ActivateReport, ClearReport, InstallReport, ItemOutcome};
use crate::router::Router;
use crate::storage::{Cache, CacheStorage};

impl<S, F, C, T> Router<S, F, C, T>
where
    S: CacheStorage,
    F: Fetcher,
    C: ClientRegistry,
    T: Timer,
{
    /// Create the static bucket for this version and precache the manifest.
    pub async fn handle_install(&self) -> Result<InstallReport, LifecycleError> {
        let bucket = self.buckets.name(BucketKind::Static);
        log::info!("[sw] installing version {}", self.version);

        let cache = self.storage.open(bucket).await?;

        let precached = join_all(
            self.config
                .precache
                .iter()
                .map(|path| self.precache_one(&cache, path)),
        )
        .await;

        for failed in precached.iter().filter(|o| !o.is_done()) {
            log::warn!("[sw] precache of {} failed: {:?}", failed.item, failed.outcome);
        }

        let skipped_waiting = match self.clients.skip_waiting().await {
            Ok(()) => true,
            Err(err) => {
                log::warn!("[sw] {}", err);
                false
            }
        };

        Ok(InstallReport {
            bucket: bucket.to_string(),
            precached,
            skipped_waiting,
        })
    }

    async fn precache_one(&self, cache: &S::Cache, path: &str) -> ItemOutcome {
        let request = Request::get(self.config.resolve(path));

        let response = match self.fetch_live(&request).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => return ItemOutcome::failed(path, FetchError::Http(response.status)),
            Err(err) => return ItemOutcome::failed(path, err),
        };

        match cache.put(&request, response).await {
            Ok(()) => ItemOutcome::done(path),
            Err(err) => ItemOutcome::failed(path, err),
        }
    }

    /// Drop stale buckets while taking control of open pages.
    ///
    /// Both halves run concurrently and both finish before this returns.
    pub async fn handle_activate(&self) -> Result<ActivateReport, LifecycleError> {
        log::info!("[sw] activating version {}", self.version);

        let (deleted, (claimed, notified)) =
            join(self.delete_stale(), self.claim_and_notify()).await;
        let deleted = deleted?;

        log::info!(
            "[sw] version {} active: {} stale bucket(s) removed, {} page(s) notified",
            self.version,
            deleted.iter().filter(|o| o.is_done()).count(),
            notified.iter().filter(|o| o.is_done()).count(),
        );

        Ok(ActivateReport {
            deleted,
            claimed,
            notified,
        })
    }

    /// Delete every bucket of this application, whatever its version.
    pub async fn clear_all(&self) -> Result<ClearReport, LifecycleError> {
        let names = self.storage.keys().await?;
        let owned = names.iter().filter(|name| self.buckets.is_owned(name));
        let deleted = self.delete_buckets(owned).await;

        log::info!("[sw] cleared {} bucket(s)", deleted.len());
        Ok(ClearReport { deleted })
    }

    async fn delete_stale(&self) -> Result<Vec<ItemOutcome>, StorageError> {
        let names = self.storage.keys().await?;
        let stale = names.iter().filter(|name| self.buckets.is_stale(name));
        Ok(self.delete_buckets(stale).await)
    }

    async fn delete_buckets<'a>(
        &self,
        names: impl Iterator<Item = &'a String>,
    ) -> Vec<ItemOutcome> {
        join_all(names.map(|name| async move {
            match self.storage.delete(name).await {
                Ok(_) => ItemOutcome::done(name.as_str()),
                Err(err) => {
                    log::warn!("[sw] {}", err);
                    ItemOutcome::failed(name.as_str(), err)
                }
            }
        }))
        .await
    }

    async fn claim_and_notify(&self) -> (bool, Vec<ItemOutcome>) {
        let claimed = match self.clients.claim().await {
            Ok(()) => true,
            Err(err) => {
                log::warn!("[sw] {}", err);
                false
            }
        };

        let clients = match self.clients.match_all().await {
            Ok(clients) => clients,
            Err(err) => {
                log::warn!("[sw] {}", err);
                return (claimed, Vec::new());
            }
        };

        let message = ClientMessage::Updated {
            version: self.version.to_string(),
        };

        let notified = clients
            .iter()
            .map(|client| match client.post_message(&message) {
                Ok(()) => ItemOutcome::done(client.id()),
                Err(err) => {
                    log::warn!("[sw] {}", err);
                    ItemOutcome::failed(client.id(), err)
                }
            })
            .collect();

        (claimed, notified)
    }
}
