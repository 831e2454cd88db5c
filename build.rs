//! Injects the build version used to name cache buckets.
//!
//! `CHAPEL_SW_VERSION` from the environment wins; otherwise the build time
//! in milliseconds since the epoch is used.

use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-env-changed=CHAPEL_SW_VERSION");
    println!("cargo:rerun-if-changed=src");

    if std::env::var_os("CHAPEL_SW_VERSION").is_none() {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        println!("cargo:rustc-env=CHAPEL_SW_VERSION={}", millis);
    }
}
