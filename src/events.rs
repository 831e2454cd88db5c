//! Wiring of service worker events to the router.
//!
//! Lifecycle handlers keep the worker alive with `waitUntil` until the
//! router finishes; fetch handlers call `respondWith` only for routed
//! requests and leave everything else to the browser. Live responses for
//! routed requests are handed to the page as the network returned them.

use std::future::Future;
use std::rc::Rc;

use chapel_core::{Interception, Route, Source, WorkerMessage};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{ExtendableEvent, ExtendableMessageEvent, FetchEvent, ServiceWorkerGlobalScope};

use crate::WebRouter;
use crate::platform::convert::{request_from_web, response_to_web};
use crate::platform::scope::{self, describe};
use crate::platform::{EventFetcher, WebPushSubscriber};

/// Register every listener on the worker scope.
pub fn register(scope: &ServiceWorkerGlobalScope, router: Rc<WebRouter>) -> Result<(), JsValue> {
    listen(scope, "install", {
        let router = Rc::clone(&router);
        move |event: ExtendableEvent| {
            let router = Rc::clone(&router);
            wait_until(&event, async move {
                let report = router
                    .handle_install()
                    .await
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                log::info!(
                    "[sw] precached {}/{} into {}",
                    report.cached().len(),
                    report.precached.len(),
                    report.bucket
                );
                Ok(JsValue::UNDEFINED)
            });
        }
    })?;

    listen(scope, "activate", {
        let router = Rc::clone(&router);
        move |event: ExtendableEvent| {
            let router = Rc::clone(&router);
            wait_until(&event, async move {
                router
                    .handle_activate()
                    .await
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                Ok(JsValue::UNDEFINED)
            });
        }
    })?;

    listen(scope, "fetch", {
        let router = Rc::clone(&router);
        move |event: FetchEvent| on_fetch(&router, event)
    })?;

    listen(scope, "message", {
        let router = Rc::clone(&router);
        move |event: ExtendableMessageEvent| {
            let message = serde_wasm_bindgen::from_value::<serde_json::Value>(event.data())
                .map(WorkerMessage::from_value)
                .unwrap_or(WorkerMessage::Unknown);

            let router = Rc::clone(&router);
            wait_until(&event, async move {
                router
                    .handle_message(&message)
                    .await
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                Ok(JsValue::UNDEFINED)
            });
        }
    })?;

    listen(scope, "pushsubscriptionchange", {
        let router = Rc::clone(&router);
        let scope = scope.clone();
        move |event: ExtendableEvent| {
            let subscriber = WebPushSubscriber::from_event(
                scope.registration(),
                &event,
                router.config().vapid_public_key.clone(),
            );

            let router = Rc::clone(&router);
            wait_until(&event, async move {
                // Failures are logged by the router and never retried.
                let _ = router.handle_push_subscription_change(&subscriber).await;
                Ok(JsValue::UNDEFINED)
            });
        }
    })?;

    Ok(())
}

fn on_fetch(router: &Rc<WebRouter>, event: FetchEvent) {
    let original = event.request();
    let request = request_from_web(&original);

    if router.classify(&request) == Route::Skip {
        return;
    }

    let router = Rc::clone(router);
    let fetcher = EventFetcher::new(original);
    let promise = future_to_promise(async move {
        match router.handle_fetch_with(&request, &fetcher).await {
            Interception::Respond(served) => {
                if served.source == Source::Network {
                    if let Some(live) = fetcher.take_live() {
                        return Ok(live.into());
                    }
                }
                response_to_web(&served.response)
                    .map(JsValue::from)
                    .or_else(|err| {
                        log::warn!("[sw] cannot build response for {}: {}", request.url, err);
                        Ok(web_sys::Response::error().into())
                    })
            }
            Interception::NetworkError(_) => Ok(web_sys::Response::error().into()),
            Interception::Passthrough => {
                let outbound = fetcher
                    .outbound()
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                let scope = scope::global()
                    .ok_or_else(|| JsValue::from_str("not running in a service worker"))?;
                JsFuture::from(scope.fetch_with_request(&outbound)).await
            }
        }
    });

    if let Err(err) = event.respond_with(&promise) {
        log::warn!("[sw] respondWith failed: {}", describe(&err));
    }
}

fn wait_until<F>(event: &ExtendableEvent, work: F)
where
    F: Future<Output = Result<JsValue, JsValue>> + 'static,
{
    if let Err(err) = event.wait_until(&future_to_promise(work)) {
        log::warn!("[sw] waitUntil failed: {}", describe(&err));
    }
}

fn listen<E, H>(scope: &ServiceWorkerGlobalScope, name: &str, mut handler: H) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    H: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        handler(event.unchecked_into::<E>());
    });
    scope.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the worker.
    closure.forget();
    Ok(())
}
