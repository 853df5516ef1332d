//! REST client for the remote test store.
//!
//! Talks to a PostgREST-style API: rows are filtered with `column=eq.value`
//! query parameters and inserts return the stored row when asked to with
//! `Prefer: return=representation`.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Question, ScoredResult, SubmittedResult, TestDefinition};

use super::{ApiError, RemoteStore};

// ============================================================================
// Constants
// ============================================================================

/// Path prefix for collection endpoints
const REST_PATH: &str = "rest/v1";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Ids come back as text or integers depending on the column type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Text(s) => f.write_str(s),
            RowId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TestRow {
    id: RowId,
    title: String,
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: RowId,
    text: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: u32,
}

impl QuestionRow {
    fn to_question(&self) -> Question {
        Question {
            id: self.id.to_string(),
            text: self.text.clone(),
            options: self.options.clone(),
            correct_answer: self.correct_answer,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    id: RowId,
}

/// REST client for the remote store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestClient {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, collection)
    }

    fn eq_filter(value: &str) -> String {
        format!("eq.{}", value)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        // The anon key is sent both as `apikey` and as the bearer token
        if let Some(ref key) = self.api_key {
            headers.insert("apikey", header::HeaderValue::from_str(key)?);
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", key))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, collection: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.collection_url(collection);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(query)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(&self, collection: &str, body: &B) -> Result<T> {
        let url = self.collection_url(collection);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    fn assemble_test(test: TestRow, questions: &[QuestionRow]) -> TestDefinition {
        TestDefinition {
            id: test.id.to_string(),
            title: test.title,
            duration: test.duration,
            questions: questions.iter().map(QuestionRow::to_question).collect(),
        }
    }
}

#[async_trait]
impl RemoteStore for RestClient {
    async fn fetch_test(&self, test_id: &str) -> Result<TestDefinition> {
        let tests: Vec<TestRow> = self
            .get("tests", &[("select", "*".to_string()), ("id", Self::eq_filter(test_id))])
            .await
            .context("Failed to fetch test")?;

        let test = tests
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("test {}", test_id)))?;

        let questions: Vec<QuestionRow> = self
            .get(
                "questions",
                &[("select", "*".to_string()), ("test_id", Self::eq_filter(test_id))],
            )
            .await
            .context("Failed to fetch questions")?;

        debug!(test_id, questions = questions.len(), "Fetched test from remote");
        Ok(Self::assemble_test(test, &questions))
    }

    async fn insert_result(&self, result: &ScoredResult) -> Result<SubmittedResult> {
        let rows: Vec<ResultRow> = self
            .insert("results", result)
            .await
            .context("Failed to insert result")?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse("insert returned no rows".to_string()))?;

        Ok(SubmittedResult {
            id: row.id.to_string(),
        })
    }
}
