//! Push re-subscription through the registration's PushManager.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chapel_core::{PushError, PushSubscriber};
use js_sys::{Object, Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{PushSubscriptionOptionsInit, ServiceWorkerRegistration};

use super::scope::describe;

/// Decode a base64url VAPID public key into raw bytes.
///
/// Padding is tolerated since keys are often copied with it.
pub fn decode_vapid_key(key: &str) -> Result<Vec<u8>, PushError> {
    URL_SAFE_NO_PAD
        .decode(key.trim().trim_end_matches('='))
        .map_err(|e| PushError::SubscribeFailed(format!("invalid VAPID key: {}", e)))
}

/// Re-subscribes with the options of the subscription being replaced.
pub struct WebPushSubscriber {
    registration: ServiceWorkerRegistration,
    /// `applicationServerKey` of the old subscription, if the event had one.
    previous_key: Option<JsValue>,
    vapid_public_key: Option<String>,
}

impl WebPushSubscriber {
    /// Build from a `pushsubscriptionchange` event.
    pub fn from_event(
        registration: ServiceWorkerRegistration,
        event: &JsValue,
        vapid_public_key: Option<String>,
    ) -> Self {
        let previous_key = Reflect::get(event, &"oldSubscription".into())
            .ok()
            .filter(|old| !old.is_undefined() && !old.is_null())
            .and_then(|old| Reflect::get(&old, &"options".into()).ok())
            .and_then(|options| Reflect::get(&options, &"applicationServerKey".into()).ok())
            .filter(|key| !key.is_undefined() && !key.is_null());

        Self {
            registration,
            previous_key,
            vapid_public_key,
        }
    }

    fn application_server_key(&self) -> Result<JsValue, PushError> {
        if let Some(key) = &self.previous_key {
            return Ok(key.clone());
        }

        let key = self
            .vapid_public_key
            .as_deref()
            .ok_or_else(|| PushError::SubscribeFailed("no application server key".to_string()))?;
        let bytes = decode_vapid_key(key)?;
        Ok(Uint8Array::from(bytes.as_slice()).into())
    }

    fn subscribe_options(&self) -> Result<PushSubscriptionOptionsInit, PushError> {
        let options = Object::new();
        let key = self.application_server_key()?;

        Reflect::set(&options, &"userVisibleOnly".into(), &JsValue::TRUE)
            .and_then(|_| Reflect::set(&options, &"applicationServerKey".into(), &key))
            .map_err(|e| PushError::SubscribeFailed(describe(&e)))?;

        Ok(options.unchecked_into())
    }
}

impl PushSubscriber for WebPushSubscriber {
    async fn resubscribe(&self) -> Result<Value, PushError> {
        let push_manager = self
            .registration
            .push_manager()
            .map_err(|_| PushError::Unavailable)?;

        let options = self.subscribe_options()?;
        let promise = push_manager
            .subscribe_with_options(&options)
            .map_err(|e| PushError::SubscribeFailed(describe(&e)))?;
        let subscription = JsFuture::from(promise)
            .await
            .map_err(|e| PushError::SubscribeFailed(describe(&e)))?;

        // JSON.stringify goes through PushSubscription.toJSON().
        let json = js_sys::JSON::stringify(&subscription)
            .ok()
            .and_then(|json| json.as_string())
            .ok_or_else(|| PushError::InvalidSubscription("not serializable".to_string()))?;

        serde_json::from_str(&json).map_err(|e| PushError::InvalidSubscription(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_vapid_key() {
        assert_eq!(decode_vapid_key("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_vapid_key("_-8").unwrap(), vec![0xff, 0xef]);
        assert_eq!(decode_vapid_key("AQI=").unwrap(), vec![1, 2]);
        assert!(decode_vapid_key("not base64!").is_err());
    }
}
