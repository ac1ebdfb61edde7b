//! # QnA turn handler
//!
//! Handles one conversation turn per inbound activity. Message activities query the answer
//! source and reply with the best match (or a fixed help message when nothing matches);
//! a conversation update greets newly joined users; any other activity kind is echoed back
//! with its type tag.

use qbot_core::{ActivityKind, HandlerError, QbotError, Result, TurnContext};
use qna_client::AnswerSource;
use std::sync::Arc;
use tracing::{info, instrument};

/// Reply sent when the knowledge base has no answer for an utterance.
pub const NO_ANSWER_REPLY: &str = "Sorry, I don't know how to help you with that.";

/// Greeting sent when a user (not the bot itself) joins the conversation.
pub const GREETING_REPLY: &str = "How can I help you?";

/// Turn handler backed by an [`AnswerSource`]. Stateless across turns; each invocation is
/// independent, so concurrent turns need no coordination.
pub struct QnaTurnHandler {
    answers: Arc<dyn AnswerSource>,
}

impl QnaTurnHandler {
    pub fn new(answers: Arc<dyn AnswerSource>) -> Self {
        Self { answers }
    }

    /// Runs one turn: at most one reply is sent per activity (none when the bot itself
    /// joins the conversation). Answer-source and transport failures propagate to the
    /// caller; no retries.
    #[instrument(skip(self, ctx), fields(activity_id = %ctx.activity().id))]
    pub async fn on_turn(&self, ctx: &TurnContext) -> Result<()> {
        let activity = ctx.activity();
        info!(kind = %activity.kind.tag(), "step: turn started");

        // The answer source is only queried for Message activities.
        match &activity.kind {
            ActivityKind::Message { text } => {
                let results = self
                    .answers
                    .generate_answer(text)
                    .await
                    .map_err(|e| QbotError::AnswerService(e.to_string()))?;
                info!(count = results.len(), "step: answers received");
                match results.first() {
                    Some(best) => ctx.send_activity(&best.answer).await?,
                    None => ctx.send_activity(NO_ANSWER_REPLY).await?,
                }
            }
            ActivityKind::ConversationUpdate { members_added } => {
                let first_added = members_added.first().ok_or(HandlerError::NoMembersAdded)?;
                if *first_added != activity.recipient_id {
                    info!(member = %first_added, "step: greeting new member");
                    ctx.send_activity(GREETING_REPLY).await?;
                }
                // The bot joining its own conversation gets no reply.
            }
            ActivityKind::Other { kind } => {
                ctx.send_activity(&format!("[{}]-type activity detected.", kind))
                    .await?;
            }
        }

        Ok(())
    }
}
