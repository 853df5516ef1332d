use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ScoredResult, SubmittedResult, TestDefinition};

/// Read and write operations the flow needs from the remote store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a test and its questions by test id.
    async fn fetch_test(&self, test_id: &str) -> Result<TestDefinition>;

    /// Insert a scored result, returning the stored row.
    async fn insert_result(&self, result: &ScoredResult) -> Result<SubmittedResult>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<T> {
    async fn fetch_test(&self, test_id: &str) -> Result<TestDefinition> {
        (**self).fetch_test(test_id).await
    }

    async fn insert_result(&self, result: &ScoredResult) -> Result<SubmittedResult> {
        (**self).insert_result(result).await
    }
}
