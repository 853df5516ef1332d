//! examcache - take cached tests from the terminal, online or offline.
//!
//! Commands:
//! - `take <test-id>`: answer a test against the clock
//! - `pending`: list results waiting to be uploaded
//! - `clear <test-id>`: drop a cached test and its saved progress
//! - `discard <timestamp>...`: drop pending results by submission time

mod commands;
mod session;

use std::io;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use examcache_core::{Config, FileStorage, OfflineStore};

const USAGE: &str = "\
Usage: examcache <command>

Commands:
  take <test-id>            Take a test (cached copy first, remote otherwise)
  pending                   List results waiting to be uploaded
  clear <test-id>           Remove a cached test and its saved progress
  discard <timestamp>...    Remove pending results by submission timestamp";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Take(String),
    Pending,
    Clear(String),
    Discard(Vec<String>),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            bail!("{}", USAGE);
        };
        match (name.as_str(), rest) {
            ("take", [test_id]) => Ok(Command::Take(test_id.clone())),
            ("pending", []) => Ok(Command::Pending),
            ("clear", [test_id]) => Ok(Command::Clear(test_id.clone())),
            ("discard", timestamps) if !timestamps.is_empty() => Ok(Command::Discard(timestamps.to_vec())),
            _ => bail!("{}", USAGE),
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Open the offline store, running without one if the directory is unusable.
fn open_store(config: &Config) -> OfflineStore {
    let storage = config
        .storage_dir()
        .and_then(|dir| Ok(FileStorage::new(dir)?));

    match storage {
        Ok(storage) => OfflineStore::new(Arc::new(storage)),
        Err(e) => {
            warn!(error = %e, "Local storage unavailable, offline caching disabled");
            OfflineStore::unavailable()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
    .apply_env();

    // Reject bad usage before touching storage
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let store = open_store(&config);
    info!(available = store.is_available(), "Offline store opened");

    match command {
        Command::Take(test_id) => session::take(&config, store, &test_id).await,
        Command::Pending => commands::list_pending(&store),
        Command::Clear(test_id) => commands::clear(&store, &test_id),
        Command::Discard(timestamps) => commands::discard(&store, &timestamps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args("take t1")).unwrap(), Command::Take("t1".to_string()));
        assert_eq!(Command::parse(&args("pending")).unwrap(), Command::Pending);
        assert_eq!(Command::parse(&args("clear t1")).unwrap(), Command::Clear("t1".to_string()));
        assert_eq!(
            Command::parse(&args("discard a b")).unwrap(),
            Command::Discard(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_bad_usage_is_an_error() {
        for line in ["", "take", "take t1 t2", "pending x", "discard", "sync"] {
            let err = Command::parse(&args(line)).unwrap_err();
            assert!(err.to_string().starts_with("Usage: examcache"), "{:?}", line);
        }
    }
}
