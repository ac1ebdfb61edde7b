//! QnA endpoint and tuning configuration: explicit structs with env-based loading.

use anyhow::{Context, Result};
use std::env;

/// Endpoint descriptor for a hosted QnA Maker knowledge base.
#[derive(Debug, Clone)]
pub struct QnaEndpoint {
    /// Service host, e.g. `https://my-service.azurewebsites.net/qnamaker`.
    pub host: String,
    /// Knowledge base id (GUID).
    pub knowledge_base_id: String,
    /// Endpoint authorization key.
    pub endpoint_key: String,
}

impl QnaEndpoint {
    pub fn new(host: String, knowledge_base_id: String, endpoint_key: String) -> Self {
        Self {
            host,
            knowledge_base_id,
            endpoint_key,
        }
    }

    /// Load from environment variables: QNA_HOST, QNA_KNOWLEDGE_BASE_ID, QNA_ENDPOINT_KEY.
    /// If `endpoint_key` is provided it overrides QNA_ENDPOINT_KEY.
    /// Call validate() after load to check config before the first request.
    pub fn from_env(endpoint_key: Option<String>) -> Result<Self> {
        let host = env::var("QNA_HOST").context("QNA_HOST not set")?;
        let knowledge_base_id =
            env::var("QNA_KNOWLEDGE_BASE_ID").context("QNA_KNOWLEDGE_BASE_ID not set")?;
        let endpoint_key = match endpoint_key {
            Some(key) => key,
            None => env::var("QNA_ENDPOINT_KEY").context("QNA_ENDPOINT_KEY not set")?,
        };
        Ok(Self {
            host,
            knowledge_base_id,
            endpoint_key,
        })
    }

    /// Validate config (host must be a valid URL, id and key non-empty). Call after load to fail fast.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.host).is_err() {
            anyhow::bail!("QNA_HOST is not a valid URL: {}", self.host);
        }
        if self.knowledge_base_id.trim().is_empty() {
            anyhow::bail!("QNA_KNOWLEDGE_BASE_ID is empty");
        }
        if self.endpoint_key.trim().is_empty() {
            anyhow::bail!("QNA_ENDPOINT_KEY is empty");
        }
        Ok(())
    }

    /// Full generateAnswer URL for this knowledge base.
    pub fn generate_answer_url(&self) -> String {
        format!(
            "{}/knowledgebases/{}/generateAnswer",
            self.host.trim_end_matches('/'),
            self.knowledge_base_id
        )
    }
}

/// Tuning options for generateAnswer.
#[derive(Debug, Clone)]
pub struct QnaOptions {
    /// Maximum number of answers to request.
    pub top: u32,
    /// Minimum confidence (0..=1) an answer must reach to be returned.
    pub score_threshold: f32,
}

impl Default for QnaOptions {
    fn default() -> Self {
        Self {
            top: 1,
            score_threshold: 0.3,
        }
    }
}

impl QnaOptions {
    /// Load from QNA_TOP and QNA_SCORE_THRESHOLD; unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let top = env::var("QNA_TOP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.top);
        let score_threshold = env::var("QNA_SCORE_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.score_threshold);
        Self {
            top,
            score_threshold,
        }
    }
}
