//! # QnA client abstraction
//!
//! Defines the [`AnswerSource`] trait and a hosted QnA Maker REST implementation.
//! Transport-agnostic; used by qna-handlers and qbot-cli.

use anyhow::Result;
use async_trait::async_trait;

pub mod config;
mod rest;

pub use config::{QnaEndpoint, QnaOptions};
pub use rest::QnaMakerClient;

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
/// Exposed for tests and for callers who need to log endpoint keys safely.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head_len = 7.min(len);
        let tail_len = 4.min(len.saturating_sub(head_len));
        let head = &token[..head_len];
        let tail = if tail_len > 0 {
            &token[len - tail_len..]
        } else {
            ""
        };
        format!("{}***{}", head, tail)
    }
}

/// A ranked candidate answer for a query. `score` is a confidence in 0..=1.
#[derive(Debug, Clone, PartialEq)]
pub struct QnaAnswer {
    pub answer: String,
    pub score: f32,
}

/// Question-answering source: returns ranked candidate answers for a user utterance.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Returns candidate answers ordered by descending confidence, best first.
    /// Empty when no answer clears the configured score threshold.
    /// Order is the service's order; implementations do not re-sort.
    async fn generate_answer(&self, question: &str) -> Result<Vec<QnaAnswer>>;
}
