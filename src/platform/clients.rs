//! Worker activation controls and open pages.

use chapel_core::{ClientError, ClientHandle, ClientMessage, ClientRegistry};
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::ServiceWorkerGlobalScope;

use super::scope::describe;

/// `self.clients` plus `self.skipWaiting()`.
#[derive(Clone)]
pub struct WebClients {
    scope: ServiceWorkerGlobalScope,
}

impl WebClients {
    pub fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }
}

impl ClientRegistry for WebClients {
    type Client = WebClient;

    async fn skip_waiting(&self) -> Result<(), ClientError> {
        let promise = self
            .scope
            .skip_waiting()
            .map_err(|e| ClientError::SkipWaitingFailed(describe(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| ClientError::SkipWaitingFailed(describe(&e)))?;
        Ok(())
    }

    async fn claim(&self) -> Result<(), ClientError> {
        JsFuture::from(self.scope.clients().claim())
            .await
            .map_err(|e| ClientError::ClaimFailed(describe(&e)))?;
        Ok(())
    }

    async fn match_all(&self) -> Result<Vec<WebClient>, ClientError> {
        let clients = JsFuture::from(self.scope.clients().match_all())
            .await
            .map_err(|e| ClientError::MatchFailed(describe(&e)))?;

        Ok(Array::from(&clients)
            .iter()
            .filter_map(|client| client.dyn_into::<web_sys::Client>().ok())
            .map(|client| WebClient { client })
            .collect())
    }
}

/// One open window or tab.
pub struct WebClient {
    client: web_sys::Client,
}

impl ClientHandle for WebClient {
    fn id(&self) -> String {
        self.client.id()
    }

    fn post_message(&self, message: &ClientMessage) -> Result<(), ClientError> {
        let value = serde_wasm_bindgen::to_value(message)
            .map_err(|_| ClientError::PostFailed(self.id()))?;
        self.client
            .post_message(&value)
            .map_err(|_| ClientError::PostFailed(self.id()))
    }
}
