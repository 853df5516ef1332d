//! examcache core library.
//!
//! Offline-capable test taking over a remote test store:
//!
//! - `storage`: key-value backends (`FileStorage`, `MemoryStorage`)
//! - `cache`: `OfflineStore`, the cached tests, saved progress and pending
//!   results kept in that storage
//! - `api`: the `RemoteStore` seam and its REST client
//! - `flow`: `ExamFlow`, which loads, times, scores and submits an attempt
//! - `models`, `config`

pub mod api;
pub mod cache;
pub mod config;
pub mod flow;
pub mod models;
pub mod storage;

pub use api::{ApiError, RemoteStore, RestClient};
pub use cache::{CacheError, OfflineStore};
pub use config::Config;
pub use flow::{Attempt, ExamFlow, LoadOutcome, Navigation, Notice, Notifier, SubmitOutcome, SubmitTrigger};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
