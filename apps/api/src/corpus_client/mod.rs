//! Corpus client: fetches pre-scored example resumes from a Hugging Face
//! datasets-server style `/rows` endpoint.
//!
//! The corpus is optional. Callers turn every `CorpusError` into "no data"
//! and carry on with rule-based analysis.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::ats::random::{shuffle, RandomSource};
use crate::models::suggestion::ExternalExample;

/// The endpoint rejects larger pages.
pub const MAX_PAGE_LENGTH: usize = 100;
/// Offsets are drawn from `0..MAX_OFFSET`, leaving room for a full page.
pub const MAX_OFFSET: usize = 6200;
/// Only examples scoring strictly above this are sampled.
pub const HIGH_SCORE_THRESHOLD: f64 = 70.0;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("corpus returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("corpus is gated or private: {0}")]
    Gated(String),

    #[error("corpus reported an error: {0}")]
    Remote(String),

    #[error("malformed corpus response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no high-scoring examples in the fetched page")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    rows: Option<Vec<RowEnvelope>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RowEnvelope {
    #[serde(default)]
    row: Option<CorpusRow>,
}

#[derive(Debug, Default, Deserialize)]
struct CorpusRow {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    ats_score: Option<f64>,
}

/// A source of scored example resumes. Implemented by the HTTP client; tests
/// substitute canned data.
#[async_trait]
pub trait ExampleSource: Send + Sync {
    /// Returns up to `limit` high-scoring examples, sorted by score descending.
    async fn high_scoring_examples(
        &self,
        limit: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ExternalExample>, CorpusError>;
}

#[derive(Clone)]
pub struct CorpusClient {
    client: Client,
    base_url: String,
    dataset: String,
}

impl CorpusClient {
    pub fn new(base_url: String, dataset: String, timeout: Duration) -> Result<Self, CorpusError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset,
        })
    }

    /// Fetches one raw page of rows starting at `offset`.
    async fn fetch_page(
        &self,
        offset: usize,
        length: usize,
    ) -> Result<Vec<ExternalExample>, CorpusError> {
        let offset_param = offset.to_string();
        let length_param = length.to_string();
        let response = self
            .client
            .get(format!("{}/rows", self.base_url))
            .header("Accept", "*/*")
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", "default"),
                ("split", "train"),
                ("offset", offset_param.as_str()),
                ("length", length_param.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<RowsResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            if is_gated_message(&message) {
                return Err(CorpusError::Gated(message));
            }
            return Err(CorpusError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: RowsResponse = serde_json::from_str(&body)?;
        if let Some(error) = parsed.error {
            if is_gated_message(&error) {
                return Err(CorpusError::Gated(error));
            }
            return Err(CorpusError::Remote(error));
        }

        let rows = parsed.rows.unwrap_or_default();
        debug!("Corpus page at offset {offset}: {} rows", rows.len());

        Ok(rows
            .into_iter()
            .filter_map(|envelope| envelope.row)
            .map(|row| ExternalExample {
                text: row.text.unwrap_or_default(),
                ats_score: row.ats_score.unwrap_or(0.0),
            })
            .collect())
    }
}

#[async_trait]
impl ExampleSource for CorpusClient {
    async fn high_scoring_examples(
        &self,
        limit: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ExternalExample>, CorpusError> {
        let offset = rng.index(MAX_OFFSET);
        let page = self.fetch_page(offset, limit.min(MAX_PAGE_LENGTH)).await?;
        let sample = sample_high_scoring(page, limit, rng);
        if sample.is_empty() {
            return Err(CorpusError::Empty);
        }
        info!("Sampled {} high-scoring examples from corpus", sample.len());
        Ok(sample)
    }
}

fn is_gated_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["authentication", "gated", "private"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Keeps examples with text and a score above the threshold, shuffles them,
/// takes `limit`, then orders by score descending.
pub fn sample_high_scoring(
    examples: Vec<ExternalExample>,
    limit: usize,
    rng: &mut dyn RandomSource,
) -> Vec<ExternalExample> {
    let mut accepted: Vec<ExternalExample> = examples
        .into_iter()
        .filter(|ex| !ex.text.is_empty() && ex.ats_score > HIGH_SCORE_THRESHOLD)
        .collect();

    shuffle(&mut accepted, rng);
    accepted.truncate(limit);
    accepted.sort_by(|a, b| b.ats_score.total_cmp(&a.ats_score));
    accepted
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Serves a fixed set of examples, or a fixed failure.
    pub struct StaticExamples(pub Option<Vec<ExternalExample>>);

    #[async_trait]
    impl ExampleSource for StaticExamples {
        async fn high_scoring_examples(
            &self,
            limit: usize,
            rng: &mut dyn RandomSource,
        ) -> Result<Vec<ExternalExample>, CorpusError> {
            let examples = self.0.clone().ok_or(CorpusError::Empty)?;
            let sample = sample_high_scoring(examples, limit, rng);
            if sample.is_empty() {
                return Err(CorpusError::Empty);
            }
            Ok(sample)
        }
    }

    pub fn example(text: &str, ats_score: f64) -> ExternalExample {
        ExternalExample {
            text: text.to_string(),
            ats_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::example;
    use super::*;
    use crate::ats::random::testing::FixedIndex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CorpusClient {
        CorpusClient::new(
            server.uri(),
            "0xnbk/resume-ats-score-v1-en".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_filters_low_scores_and_sorts_descending() {
        let examples = vec![
            example("a", 72.0),
            example("b", 95.0),
            example("c", 70.0),
            example("", 99.0),
            example("d", 81.5),
        ];
        let sample = sample_high_scoring(examples, 100, &mut FixedIndex(0));
        let scores: Vec<f64> = sample.iter().map(|e| e.ats_score).collect();
        assert_eq!(scores, vec![95.0, 81.5, 72.0]);
    }

    #[test]
    fn test_sample_respects_limit() {
        let examples = (0..10).map(|i| example("x", 71.0 + i as f64)).collect();
        let sample = sample_high_scoring(examples, 4, &mut FixedIndex(0));
        assert_eq!(sample.len(), 4);
        assert!(sample.windows(2).all(|w| w[0].ats_score >= w[1].ats_score));
    }

    #[test]
    fn test_gated_message_detection() {
        assert!(is_gated_message("The dataset is gated"));
        assert!(is_gated_message("Authentication required"));
        assert!(!is_gated_message("Internal error"));
    }

    #[tokio::test]
    async fn test_fetch_parses_rows_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rows"))
            .and(query_param("dataset", "0xnbk/resume-ats-score-v1-en"))
            .and(query_param("split", "train"))
            .and(query_param("offset", "0"))
            .and(query_param("length", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [
                    {"row_idx": 0, "row": {"text": "Led 5 teams", "ats_score": 88}},
                    {"row_idx": 1, "row": {"text": "Weak resume", "ats_score": 40}},
                    {"row_idx": 2, "row": {"text": "Increased revenue 20%", "ats_score": 91.5}}
                ]
            })))
            .mount(&server)
            .await;

        let sample = client_for(&server)
            .high_scoring_examples(100, &mut FixedIndex(0))
            .await
            .unwrap();
        assert_eq!(sample.len(), 2);
        assert_eq!(sample[0].ats_score, 91.5);
        assert_eq!(sample[1].text, "Led 5 teams");
    }

    #[tokio::test]
    async fn test_error_field_in_success_body_is_gated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "The dataset is gated, authentication required"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .high_scoring_examples(100, &mut FixedIndex(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Gated(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_status_with_gated_body_is_gated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rows"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "The dataset requires authentication"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .high_scoring_examples(100, &mut FixedIndex(0))
            .await
            .unwrap_err();
        match err {
            CorpusError::Gated(message) => {
                assert_eq!(message, "The dataset requires authentication");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rows"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .high_scoring_examples(100, &mut FixedIndex(0))
            .await
            .unwrap_err();
        match err {
            CorpusError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_page_without_high_scores_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [{"row": {"text": "meh", "ats_score": 50}}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .high_scoring_examples(100, &mut FixedIndex(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Empty));
    }

    #[tokio::test]
    async fn test_unreachable_corpus_is_http_error() {
        let client = CorpusClient::new(
            "http://127.0.0.1:9".to_string(),
            "x/y".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client
            .high_scoring_examples(100, &mut FixedIndex(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Http(_)));
    }
}
