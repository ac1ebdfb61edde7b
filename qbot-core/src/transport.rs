//! Transport abstraction for sending replies, plus the per-turn context.
//!
//! [`Transport`] is transport-agnostic; [`ConsoleTransport`] implements it on stdout
//! for the console host.

use crate::error::Result;
use crate::types::{Activity, Conversation};
use async_trait::async_trait;
use std::sync::Arc;

/// Abstraction for sending a reply into a conversation. Implementations map to a channel
/// (console, or a real messaging connector).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a plain text activity to the given conversation.
    async fn send_activity(&self, conversation: &Conversation, text: &str) -> Result<()>;
}

/// Per-turn context: the inbound activity plus the transport used to reply to it.
/// The activity is read-only for the duration of the turn.
pub struct TurnContext {
    activity: Activity,
    transport: Arc<dyn Transport>,
}

impl TurnContext {
    pub fn new(activity: Activity, transport: Arc<dyn Transport>) -> Self {
        Self { activity, transport }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Sends `text` back into the activity's conversation.
    pub async fn send_activity(&self, text: &str) -> Result<()> {
        self.transport
            .send_activity(&self.activity.conversation, text)
            .await
    }
}

/// Stdout implementation of [`Transport`]; used by the console host.
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_activity(&self, _conversation: &Conversation, text: &str) -> Result<()> {
        println!("bot> {}", text);
        Ok(())
    }
}
