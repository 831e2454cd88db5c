mod common;

use chapel_core::mock::ScriptedFetcher;
use chapel_core::{FetchError, Interception, Method, Request, Response, Route, Served, Source};
use common::{html, json, router, timing_out_router, url};

fn served(interception: Interception) -> Served {
    match interception {
        Interception::Respond(served) => served,
        other => panic!("expected a response, got {:?}", other),
    }
}

#[tokio::test]
async fn post_requests_pass_through_untouched() {
    let router = router("2");
    let request = Request::new(Method::Post, url("/api/v1/events/4/rsvp"));

    assert_eq!(router.handle_fetch(&request).await, Interception::Passthrough);
    assert_eq!(router.fetcher().call_count(), 0);
    assert!(router.storage().bucket_names().is_empty());
}

#[tokio::test]
async fn non_http_requests_pass_through() {
    let router = router("2");
    let request = Request::get("chrome-extension://abcdef/inject.js");

    assert_eq!(router.handle_fetch(&request).await, Interception::Passthrough);
}

#[tokio::test]
async fn classification_through_router_is_stable() {
    let router = router("2");
    assert_eq!(router.classify(&Request::get(url("/api/v1/x"))), Route::Api);
    assert_eq!(router.classify(&Request::get(url("/api/v1/x.json"))), Route::Api);
    assert_eq!(
        router.classify(&Request::new(Method::Post, url("/main.js"))),
        Route::Skip
    );
    assert_eq!(router.classify(&Request::get(url("/members"))), Route::Navigation);
}

#[tokio::test]
async fn network_first_writes_through_on_success() {
    let router = router("2");
    let events = url("/api/v1/events");
    router
        .fetcher()
        .respond(&events, json(200, r#"[{"id":1,"title":"Choir practice"}]"#));

    let served = served(router.handle_fetch(&Request::get(&events)).await);

    assert_eq!(served.source, Source::Network);
    let cached = router.storage().entry("app-api-v2", &events).unwrap();
    assert_eq!(cached.status, served.response.status);
    assert_eq!(cached.body, served.response.body);
}

#[tokio::test]
async fn network_first_does_not_cache_error_statuses() {
    let router = router("2");
    let events = url("/api/v1/events");
    router.fetcher().respond(&events, json(500, r#"{"error":"boom"}"#));

    let served = served(router.handle_fetch(&Request::get(&events)).await);

    assert_eq!(served.source, Source::Network);
    assert_eq!(served.response.status, 500);
    assert_eq!(router.storage().entry("app-api-v2", &events), None);
}

#[tokio::test]
async fn network_first_falls_back_to_cache_when_offline() {
    let router = router("2");
    let members = url("/api/v1/members");
    let seeded = json(200, r#"[{"name":"Ruth"}]"#);
    router.storage().seed("app-api-v2", &members, seeded.clone());

    let served = router
        .network_first(&Request::get(&members), Route::Api)
        .await;

    assert_eq!(served.source, Source::Cache);
    assert_eq!(served.response, seeded);
    assert_eq!(router.fetcher().call_count(), 1);
}

#[tokio::test]
async fn network_first_falls_back_to_cache_on_timeout() {
    let router = timing_out_router("2");
    let page = url("/announcements");
    router.fetcher().hang(&page);
    router.storage().seed("app-dynamic-v2", &page, html("cached announcements"));

    let served = served(router.handle_fetch(&Request::get(&page)).await);

    assert_eq!(served.source, Source::Cache);
    assert_eq!(served.response.text(), "cached announcements");
}

#[tokio::test]
async fn timeout_surfaces_as_fetch_error() {
    let router = timing_out_router("2");
    let page = url("/announcements");
    router.fetcher().hang(&page);

    let err = router.fetch_live(&Request::get(&page)).await.unwrap_err();

    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn offline_api_request_gets_json_sentinel() {
    let router = router("2");
    let events = url("/api/v1/events");
    router.fetcher().fail(
        &events,
        FetchError::Network("TypeError: Failed to fetch".to_string()),
    );

    let served = served(router.handle_fetch(&Request::get(&events)).await);

    assert_eq!(served.source, Source::Offline);
    assert_eq!(served.response.status, 503);
    assert_eq!(served.response.header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(&served.response.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"error": "Offline", "message": "No internet connection"})
    );
}

#[tokio::test]
async fn offline_navigation_without_cache_gets_offline_page() {
    let router = router("2");
    router
        .storage()
        .seed("app-static-v2", &url("/offline.html"), html("You are offline"));

    let served = served(router.handle_fetch(&Request::get(url("/events/12"))).await);

    assert_eq!(served.source, Source::Offline);
    assert_eq!(served.response.text(), "You are offline");
}

#[tokio::test]
async fn offline_navigation_prefers_precached_shell() {
    let router = router("2");
    router.storage().seed("app-static-v2", &url("/"), html("app shell"));
    router
        .storage()
        .seed("app-static-v2", &url("/offline.html"), html("You are offline"));

    let served = served(router.handle_fetch(&Request::get(url("/"))).await);

    assert_eq!(served.source, Source::Cache);
    assert_eq!(served.response.text(), "app shell");
}

#[tokio::test]
async fn offline_dynamic_request_gets_text_sentinel() {
    let router = router("2");

    let served = served(router.handle_fetch(&Request::get(url("/manifest.json"))).await);

    assert_eq!(served.source, Source::Offline);
    assert_eq!(served.response.status, 503);
    assert_eq!(served.response.text(), "Offline");
}

#[tokio::test]
async fn cache_first_skips_network_on_hit() {
    let router = router("2");
    let script = url("/main.abc123.js");
    let seeded = Response::new(200, "console.log('cached')")
        .with_header("Content-Type", "text/javascript");
    router.storage().seed("app-static-v2", &script, seeded.clone());
    router
        .fetcher()
        .respond(&script, Response::new(200, "console.log('live')"));

    let served = served(router.handle_fetch(&Request::get(&script)).await);

    assert_eq!(served.source, Source::Cache);
    assert_eq!(served.response, seeded);
    assert_eq!(router.fetcher().call_count(), 0);
}

#[tokio::test]
async fn cache_first_fetches_and_stores_on_miss() {
    let router = router("2");
    let style = url("/styles/app.css");
    router
        .fetcher()
        .respond(&style, Response::new(200, "body { margin: 0 }"));

    let first = served(router.handle_fetch(&Request::get(&style)).await);
    let second = served(router.handle_fetch(&Request::get(&style)).await);

    assert_eq!(first.source, Source::Network);
    assert_eq!(second.source, Source::Cache);
    assert_eq!(second.response.body, first.response.body);
    assert_eq!(router.fetcher().call_count(), 1);
}

#[tokio::test]
async fn cache_first_offline_serves_offline_page() {
    let router = router("2");
    router
        .storage()
        .seed("app-static-v2", &url("/offline.html"), html("You are offline"));

    let served = served(router.handle_fetch(&Request::get(url("/img/logo.png"))).await);

    assert_eq!(served.source, Source::Offline);
    assert_eq!(served.response.text(), "You are offline");
}

#[tokio::test]
async fn cache_first_offline_without_offline_page_is_network_error() {
    let router = router("2");

    let interception = router.handle_fetch(&Request::get(url("/img/logo.png"))).await;

    assert!(matches!(
        interception,
        Interception::NetworkError(FetchError::Network(_))
    ));
}

#[tokio::test]
async fn failed_write_still_returns_live_response() {
    let router = router("2");
    let events = url("/api/v1/events");
    router.fetcher().respond(&events, json(200, "[]"));
    router.storage().fail_writes();

    let served = served(router.handle_fetch(&Request::get(&events)).await);

    assert_eq!(served.source, Source::Network);
    assert_eq!(served.response.text(), "[]");
    assert_eq!(router.storage().entry("app-api-v2", &events), None);
}

#[tokio::test]
async fn unopenable_bucket_falls_through_to_sentinel() {
    let router = router("2");
    router.storage().fail_open("app-api-v2");

    let served = served(router.handle_fetch(&Request::get(url("/api/v1/events"))).await);

    assert_eq!(served.source, Source::Offline);
    assert_eq!(served.response.status, 503);
}

#[tokio::test]
async fn fragment_is_ignored_for_cache_lookups() {
    let router = router("2");
    let page = url("/events");
    router.storage().seed("app-dynamic-v2", &page, html("events"));

    let served = served(router.handle_fetch(&Request::get(format!("{page}#upcoming"))).await);

    assert_eq!(served.source, Source::Cache);
    assert_eq!(served.response.text(), "events");
}

#[tokio::test]
async fn intercepted_requests_use_the_per_request_fetcher() {
    let router = router("2");
    let events = url("/api/v1/events");
    let intercepted = ScriptedFetcher::new();
    intercepted.respond(&events, json(200, "[]"));

    let served = served(router.handle_fetch_with(&Request::get(&events), &intercepted).await);

    assert_eq!(served.source, Source::Network);
    assert_eq!(intercepted.call_count(), 1);
    assert_eq!(router.fetcher().call_count(), 0);
    assert!(router.storage().entry("app-api-v2", &events).is_some());
}

#[tokio::test]
async fn opaque_cross_origin_asset_is_returned_but_not_cached() {
    let router = router("2");
    let avatar = "https://cdn.example/avatar.png";
    let intercepted = ScriptedFetcher::new();
    intercepted.respond(avatar, Response::opaque());

    let served = served(router.handle_fetch_with(&Request::get(avatar), &intercepted).await);

    assert_eq!(served.source, Source::Network);
    assert!(served.response.is_opaque());
    assert_eq!(router.storage().entry("app-static-v2", avatar), None);
}
