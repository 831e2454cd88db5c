//! Offline cache router for the chapel web application.
//!
//! Sits between the application's requests and the network:
//! - [`Router::handle_install`] / [`Router::handle_activate`] manage
//!   version-scoped cache buckets ([`BucketNames`])
//! - [`Router::handle_fetch`] classifies requests ([`Route`]) and runs the
//!   network-first or cache-first strategy
//! - [`Router::handle_message`] and
//!   [`Router::handle_push_subscription_change`] cover page commands and
//!   push renewal
//!
//! Platform access is injected through [`CacheStorage`], [`Fetcher`],
//! [`Timer`], [`ClientRegistry`] and [`PushSubscriber`]. In-memory fakes are
//! available behind the `mock` feature.

pub mod bucket;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
mod lifecycle;
pub mod message;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod network;
pub mod offline;
pub mod push;
pub mod report;
pub mod route;
mod router;
pub mod storage;
mod strategy;
pub mod url;
pub mod version;

pub use bucket::{BucketKind, BucketNames};
pub use clients::{ClientHandle, ClientRegistry};
pub use config::RouterConfig;
pub use error::{
    ClientError, ConfigError, FetchError, LifecycleError, PushError, StorageError, VersionError,
};
pub use http::{Method, Request, Response};
pub use message::{ClientMessage, WorkerMessage};
pub use network::{Fetcher, Timer};
pub use push::PushSubscriber;
pub use report::{ActivateReport, ClearReport, InstallReport, ItemOutcome, Outcome};
pub use route::{Route, RouteClassifier};
pub use router::{Interception, MessageOutcome, Router, Served, Source};
pub use storage::{Cache, CacheStorage};
pub use version::Version;
