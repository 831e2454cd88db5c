//! Push subscription renewal.
//!
//! When the platform invalidates a push subscription the worker subscribes
//! again with the previous options and forwards the new subscription to the
//! server. Failures are logged and returned, never retried.

use serde_json::Value;

use crate::clients::ClientRegistry;
use crate::error::{FetchError, PushError};
use crate::http::Request;
use crate::network::{Fetcher, Timer};
use crate::router::Router;
use crate::storage::CacheStorage;

/// Re-subscribes to push using the previously used options.
#[allow(async_fn_in_trait)]
pub trait PushSubscriber {
    /// The new subscription, serialized as the platform's `toJSON()` form.
    async fn resubscribe(&self) -> Result<Value, PushError>;
}

impl<S, F, C, T> Router<S, F, C, T>
where
    S: CacheStorage,
    F: Fetcher,
    C: ClientRegistry,
    T: Timer,
{
    /// Renew the push subscription and POST it to the configured endpoint.
    pub async fn handle_push_subscription_change<P: PushSubscriber>(
        &self,
        subscriber: &P,
    ) -> Result<(), PushError> {
        let result = self.renew_subscription(subscriber).await;
        match &result {
            Ok(()) => log::info!("[sw] push subscription renewed"),
            Err(err) => log::warn!("[sw] push subscription renewal failed: {}", err),
        }
        result
    }

    async fn renew_subscription<P: PushSubscriber>(&self, subscriber: &P) -> Result<(), PushError> {
        let subscription = subscriber.resubscribe().await?;

        let request = Request::post_json(self.config.resolve(&self.config.push_endpoint), &subscription)
            .map_err(|e| PushError::InvalidSubscription(e.to_string()))?;

        let response = self.fetch_live(&request).await?;
        if !response.is_success() {
            return Err(FetchError::Http(response.status).into());
        }

        Ok(())
    }
}
