//! The answer service: the external collaborator that replies to queries.
//!
//! [`AnswerService`] is the port the rest of the engine talks to.
//! [`HttpAnswerService`] is the production adapter, posting JSON to
//! `{base_url}/query`.
//!
//! # Reply shape
//!
//! ```text
//! { "result": { "query": "...", "result": "<answer text>" } }
//! ```
//!
//! The answer is the nested `result.result` string. Anything else that is
//! still valid JSON (an `{"error": ...}` body, `{}`, a non-string payload)
//! means no result. The HTTP status is not consulted: the server reports
//! failures as JSON bodies, and those carry no result.

use crate::request::QueryRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Default base URL of the answer service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Outcome of a query that reached the service and produced a readable reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The service answered with this text.
    Found(String),
    /// The reply had no usable result.
    NoResult,
}

/// Failures talking to the answer service.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// The request could not be sent or the reply could not be received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The reply body was not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Something that can answer a query.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Send one query and wait for its reply.
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, AnswerError>;
}

/// Answer service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    client: Client,
    base_url: String,
}

impl HttpAnswerService {
    /// Create a client for the service at `base_url` (without the `/query` path).
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The full query endpoint URL.
    pub fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, AnswerError> {
        let url = self.query_url();
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), "answer service replied");

        parse_reply(&body)
    }
}

/// Interpret a reply body from the answer service.
pub fn parse_reply(body: &[u8]) -> Result<Answer, AnswerError> {
    let value: Value = serde_json::from_slice(body).map_err(AnswerError::Parse)?;
    Ok(answer_from_value(&value))
}

fn answer_from_value(value: &Value) -> Answer {
    value
        .get("result")
        .and_then(|result| result.get("result"))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map_or(Answer::NoResult, |text| Answer::Found(text.to_string()))
}
