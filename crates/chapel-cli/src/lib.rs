//! Operator tooling for the chapel service worker.
//!
//! Native counterpart of the wasm adapter: derives the build version that
//! scopes cache buckets, prints bucket names, and checks router
//! configuration before it is baked into a deployment.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chapel_core::{
    BucketNames, ConfigError, Method, Route, RouteClassifier, RouterConfig, Version, VersionError,
};
use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};

/// Hex characters of the content fingerprint appended to a version.
pub const FINGERPRINT_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("system clock is before the unix epoch")]
    Clock,
}

// =============================================================================
// Arguments
// =============================================================================

/// Build and inspection helpers for the chapel service worker.
#[derive(Parser, Debug)]
#[command(name = "chapel", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive a build version (unix millis, optionally fingerprinted).
    Version {
        /// Use this timestamp instead of the current time.
        #[arg(long)]
        at: Option<u128>,

        /// Append a short SHA-256 of these files.
        #[arg(long, num_args = 1..)]
        fingerprint: Vec<PathBuf>,
    },

    /// Print the three bucket names for a version.
    Buckets {
        version: String,

        #[arg(long, default_value = chapel_core::config::DEFAULT_PREFIX)]
        prefix: String,
    },

    /// Show how a request would be routed.
    Classify {
        method: String,
        url: String,

        /// Router config (TOML); defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a router config file.
    Check { config: PathBuf },
}

// =============================================================================
// Commands
// =============================================================================

/// Run one command and return what should be printed.
pub fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Command::Version { at, fingerprint } => {
            let millis = match at {
                Some(millis) => millis,
                None => now_millis()?,
            };
            let version = derive_version(millis, &fingerprint)?;
            Ok(version.to_string())
        }
        Command::Buckets { version, prefix } => {
            let version = Version::new(version)?;
            let names = BucketNames::new(&prefix, &version);
            Ok(names.current().join("\n"))
        }
        Command::Classify {
            method,
            url,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => RouterConfig::default(),
            };
            let route = classify(&config, &method, &url)?;
            Ok(describe_route(&config, route))
        }
        Command::Check { config } => {
            let loaded = load_config(&config)?;
            loaded.validate()?;
            Ok(format!(
                "{}: ok ({} precached, offline page {})",
                config.display(),
                loaded.precache.len(),
                loaded.offline_page
            ))
        }
    }
}

/// Version from a timestamp, suffixed with a fingerprint of `files` if any.
pub fn derive_version(millis: u128, files: &[PathBuf]) -> Result<Version, CliError> {
    let base = Version::from_unix_millis(millis);
    if files.is_empty() {
        return Ok(base);
    }
    let hash = fingerprint(files)?;
    Ok(Version::new(format!("{}-{}", base, hash))?)
}

/// First [`FINGERPRINT_LEN`] hex chars of SHA-256 over the files, in order.
pub fn fingerprint(files: &[PathBuf]) -> Result<String, CliError> {
    let mut hasher = Sha256::new();
    for path in files {
        let bytes = std::fs::read(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        hasher.update(&bytes);
    }
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_LEN);
    Ok(digest)
}

pub fn load_config(path: &Path) -> Result<RouterConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &text)
}

fn parse_config(path: &Path, text: &str) -> Result<RouterConfig, CliError> {
    toml::from_str(text).map_err(|e| CliError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn classify(config: &RouterConfig, method: &str, url: &str) -> Result<Route, CliError> {
    config.validate()?;
    let classifier = RouteClassifier::new(config)?;
    Ok(classifier.classify(&Method::parse(method), url))
}

fn describe_route(config: &RouterConfig, route: Route) -> String {
    let strategy = match route {
        Route::Skip => return "skip (browser default)".to_string(),
        Route::StaticAsset => "cache-first",
        Route::Api | Route::Navigation | Route::Dynamic => "network-first",
    };
    match route.bucket() {
        Some(kind) => format!("{} {} -> {}-{}-v*", route.as_str(), strategy, config.prefix, kind),
        None => format!("{} {}", route.as_str(), strategy),
    }
}

fn now_millis() -> Result<u128, CliError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .map_err(|_| CliError::Clock)
}
