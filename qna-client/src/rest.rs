//! QnA Maker REST implementation of [`AnswerSource`].

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{QnaEndpoint, QnaOptions};
use crate::{mask_token, AnswerSource, QnaAnswer};

/// Client for a hosted QnA Maker knowledge base.
#[derive(Debug, Clone)]
pub struct QnaMakerClient {
    client: Client,
    endpoint: QnaEndpoint,
    options: QnaOptions,
}

impl QnaMakerClient {
    /// Creates a client for the given endpoint with default options.
    pub fn new(endpoint: QnaEndpoint) -> Self {
        Self::with_options(endpoint, QnaOptions::default())
    }

    /// Creates a client with explicit tuning options.
    pub fn with_options(endpoint: QnaEndpoint, options: QnaOptions) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            endpoint,
            options,
        }
    }

    /// Returns the configured options.
    pub fn options(&self) -> &QnaOptions {
        &self.options
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateAnswerRequest<'a> {
    question: &'a str,
    top: u32,
    /// The service expects the threshold on its raw 0..=100 scale.
    score_threshold: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateAnswerResponse {
    answers: Vec<RawAnswer>,
}

#[derive(Debug, Deserialize)]
struct RawAnswer {
    answer: String,
    /// Confidence on the service's 0..=100 scale.
    score: f32,
}

/// Maps raw wire answers into ranked [`QnaAnswer`]s: scales scores from the wire's
/// 0..=100 to 0..=1, drops the no-match sentinel (raw score 0) and anything below
/// `options.score_threshold`. Order is preserved as returned by the service.
fn rank_answers(raw: Vec<RawAnswer>, options: &QnaOptions) -> Vec<QnaAnswer> {
    raw.into_iter()
        .filter(|a| a.score > 0.0)
        .map(|a| QnaAnswer {
            answer: a.answer,
            score: a.score / 100.0,
        })
        .filter(|a| a.score >= options.score_threshold)
        .collect()
}

#[async_trait]
impl AnswerSource for QnaMakerClient {
    /// Calls the knowledge base's generateAnswer endpoint and returns the ranked answers.
    ///
    /// Logs the masked endpoint key, a question preview, and the request JSON. Fails on
    /// network errors, non-success status codes, and malformed response bodies.
    #[instrument(skip(self, question))]
    async fn generate_answer(&self, question: &str) -> Result<Vec<QnaAnswer>> {
        const LOG_PREVIEW_LEN: usize = 200;
        let question_preview = if question.len() <= LOG_PREVIEW_LEN {
            question.to_string()
        } else {
            format!("{}...", &question[..LOG_PREVIEW_LEN])
        };
        info!(
            knowledge_base = %self.endpoint.knowledge_base_id,
            endpoint_key = %mask_token(&self.endpoint.endpoint_key),
            question_preview = %question_preview,
            question_len = question.len(),
            "QnA generateAnswer request"
        );

        let request = GenerateAnswerRequest {
            question,
            top: self.options.top,
            score_threshold: self.options.score_threshold * 100.0,
        };

        if let Ok(json) = serde_json::to_string_pretty(&request) {
            info!(request_json = %json, "QnA generateAnswer request JSON");
        }

        let response = self
            .client
            .post(self.endpoint.generate_answer_url())
            .header(
                "Authorization",
                format!("EndpointKey {}", self.endpoint.endpoint_key),
            )
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "QnA Maker API error ({}): {}",
                status,
                error_text
            ));
        }

        let body: GenerateAnswerResponse = response.json().await?;
        let answers = rank_answers(body.answers, &self.options);

        info!(
            count = answers.len(),
            top_score = ?answers.first().map(|a| a.score),
            "QnA generateAnswer done"
        );
        Ok(answers)
    }
}
