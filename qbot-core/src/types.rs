//! Core types: conversation, activity, and the tagged activity kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation (channel or direct chat) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
}

/// A single unit of inbound conversation traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub conversation: Conversation,
    /// Identity the transport addressed this activity to (the bot itself).
    pub recipient_id: String,
    pub kind: ActivityKind,
    pub created_at: DateTime<Utc>,
}

/// Activity payload, tagged by type. Handlers match on this exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivityKind {
    /// A user utterance.
    Message { text: String },
    /// Membership change; `members_added` lists participants that joined, in transport order.
    ConversationUpdate { members_added: Vec<String> },
    /// Any other transport activity, carrying its literal type tag (e.g. "Typing").
    Other { kind: String },
}

impl ActivityKind {
    /// Short tag for logging.
    pub fn tag(&self) -> &str {
        match self {
            ActivityKind::Message { .. } => "Message",
            ActivityKind::ConversationUpdate { .. } => "ConversationUpdate",
            ActivityKind::Other { kind } => kind,
        }
    }
}
