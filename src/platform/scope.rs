//! Service worker global scope access.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::ServiceWorkerGlobalScope;

/// The worker's global scope, `None` outside a service worker.
pub fn global() -> Option<ServiceWorkerGlobalScope> {
    js_sys::global().dyn_into::<ServiceWorkerGlobalScope>().ok()
}

/// Origin of the registration scope (`https://host`).
pub fn origin(scope: &ServiceWorkerGlobalScope) -> Option<String> {
    let scope_url = scope.registration().scope();
    chapel_core::url::origin(&scope_url).map(str::to_string)
}

/// Best-effort string form of a thrown JavaScript value.
pub fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &"message".into())
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", err))
}
