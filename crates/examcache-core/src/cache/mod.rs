//! Local caching module for offline test taking.
//!
//! `OfflineStore` keeps three namespaces in a `KeyValueStorage`:
//! - `offline_exam_<testId>`: cached test definitions
//! - `exam_progress_<testId>`: in-progress answer maps
//! - `pending_results`: scored results waiting for upload
//!
//! A store built without storage answers every read with an empty value and
//! ignores every write.

pub mod error;
pub mod store;

pub use error::CacheError;
pub use store::OfflineStore;
