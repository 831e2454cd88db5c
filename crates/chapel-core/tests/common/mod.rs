#![allow(dead_code)]

use chapel_core::mock::{
    ImmediateTimer, MemoryCacheStorage, NeverTimer, RecordingClients, ScriptedFetcher,
};
use chapel_core::{Response, Router, RouterConfig, Timer, Version};

pub const ORIGIN: &str = "https://app.test";

pub type TestRouter<T = NeverTimer> = Router<MemoryCacheStorage, ScriptedFetcher, RecordingClients, T>;

pub fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

pub fn config() -> RouterConfig {
    RouterConfig::default()
        .with_prefix("app")
        .with_origin(ORIGIN)
}

pub fn router_with<T: Timer>(
    version: &str,
    storage: MemoryCacheStorage,
    fetcher: ScriptedFetcher,
    clients: RecordingClients,
    timer: T,
) -> Router<MemoryCacheStorage, ScriptedFetcher, RecordingClients, T> {
    Router::new(
        config(),
        Version::new(version).unwrap(),
        storage,
        fetcher,
        clients,
        timer,
    )
    .unwrap()
}

pub fn router(version: &str) -> TestRouter {
    router_with(
        version,
        MemoryCacheStorage::new(),
        ScriptedFetcher::new(),
        RecordingClients::default(),
        NeverTimer,
    )
}

pub fn timing_out_router(version: &str) -> TestRouter<ImmediateTimer> {
    router_with(
        version,
        MemoryCacheStorage::new(),
        ScriptedFetcher::new(),
        RecordingClients::default(),
        ImmediateTimer,
    )
}

pub fn html(body: &str) -> Response {
    Response::new(200, body).with_header("Content-Type", "text/html")
}

pub fn json(status: u16, body: &str) -> Response {
    Response::new(status, body).with_header("Content-Type", "application/json")
}
