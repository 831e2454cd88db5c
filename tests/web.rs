#![cfg(target_arch = "wasm32")]

use chapel_core::Response;
use chapel_sw::platform::convert::{header_pairs, response_from_web, response_to_web};
use chapel_sw::platform::{EventFetcher, decode_vapid_key};
use wasm_bindgen_test::*;
use web_sys::{RequestCredentials, RequestInit, RequestMode};

fn cross_origin_image_request() -> web_sys::Request {
    let init = RequestInit::new();
    init.set_mode(RequestMode::NoCors);
    init.set_credentials(RequestCredentials::Include);
    web_sys::Request::new_with_str_and_init("https://cdn.example/avatar.png", &init).unwrap()
}

#[wasm_bindgen_test]
async fn response_survives_platform_conversion() {
    let original = Response::new(200, r#"{"ok":true}"#).with_header("content-type", "application/json");

    let web = response_to_web(&original).unwrap();
    assert_eq!(web.status(), 200);

    let back = response_from_web(&web).await.unwrap();
    assert_eq!(back.status, 200);
    assert_eq!(back.body, original.body);
    assert_eq!(back.header("Content-Type"), Some("application/json"));
}

#[wasm_bindgen_test]
fn null_body_status_builds() {
    let web = response_to_web(&Response::new(204, "")).unwrap();
    assert_eq!(web.status(), 204);
}

#[wasm_bindgen_test]
fn header_pairs_are_lowercased_by_platform() {
    let headers = web_sys::Headers::new().unwrap();
    headers.append("X-Chapel", "1").unwrap();

    assert_eq!(
        header_pairs(&headers),
        vec![("x-chapel".to_string(), "1".to_string())]
    );
}

#[wasm_bindgen_test]
fn vapid_key_decodes() {
    assert_eq!(decode_vapid_key("AQID").unwrap(), vec![1, 2, 3]);
}

#[wasm_bindgen_test]
fn intercepted_request_goes_out_with_its_mode_and_credentials() {
    let fetcher = EventFetcher::new(cross_origin_image_request());

    let outbound = fetcher.outbound().unwrap();

    assert_eq!(outbound.url(), "https://cdn.example/avatar.png");
    assert_eq!(outbound.mode(), RequestMode::NoCors);
    assert_eq!(outbound.credentials(), RequestCredentials::Include);
    assert!(fetcher.take_live().is_none());
}

#[wasm_bindgen_test]
fn opaque_response_is_never_rebuilt() {
    assert!(response_to_web(&Response::opaque()).is_err());
}
