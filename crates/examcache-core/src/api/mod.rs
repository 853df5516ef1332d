//! Remote data store access.
//!
//! `RemoteStore` is the seam the test-taking flow depends on; `RestClient`
//! implements it over a PostgREST-style REST API exposing the `tests`,
//! `questions` and `results` collections.

pub mod client;
pub mod error;
pub mod remote;

pub use client::RestClient;
pub use error::ApiError;
pub use remote::RemoteStore;
