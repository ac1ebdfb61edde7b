//! Integration tests for [`qna_handlers::QnaTurnHandler`].
//!
//! Covers: best-match reply for answered messages, the fixed fallback for unanswered
//! messages, greeting on member join (skipped when the bot itself joins), the literal
//! type echo for other activity kinds, error propagation from the answer source, the
//! empty-members fault, and the one-reply-per-turn invariant.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use qbot_core::{
    Activity, ActivityKind, Conversation, HandlerError, QbotError, Result as CoreResult,
    Transport, TurnContext,
};
use qna_client::{AnswerSource, QnaAnswer};
use qna_handlers::{QnaTurnHandler, GREETING_REPLY, NO_ANSWER_REPLY};

fn create_test_activity(kind: ActivityKind) -> Activity {
    Activity {
        id: "test_activity_id".to_string(),
        conversation: Conversation {
            id: "conv1".to_string(),
        },
        recipient_id: "bot1".to_string(),
        kind,
        created_at: Utc::now(),
    }
}

/// **Test: Message with answers replies with the first (best) answer.**
///
/// **Setup:** Stub source returns two answers, best first.
/// **Action:** `on_turn` with a Message activity.
/// **Expected:** Exactly one reply, equal to the first answer's text; source called once.
#[tokio::test]
async fn test_message_with_answers_replies_best_match() {
    let answers = StubAnswers::with_answers(vec![
        QnaAnswer {
            answer: "9am-5pm".to_string(),
            score: 0.9,
        },
        QnaAnswer {
            answer: "closed on Sundays".to_string(),
            score: 0.4,
        },
    ]);
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(answers.clone());

    let activity = create_test_activity(ActivityKind::Message {
        text: "store hours".to_string(),
    });
    handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await
        .unwrap();

    assert_eq!(transport.sent(), vec!["9am-5pm".to_string()]);
    assert_eq!(answers.calls.load(Ordering::SeqCst), 1);
}

/// **Test: Message with no answers replies with the fixed fallback.**
///
/// **Setup:** Stub source returns an empty answer list.
/// **Action:** `on_turn` with a Message activity.
/// **Expected:** Exactly one reply, equal to the fallback string.
#[tokio::test]
async fn test_message_without_answers_replies_fallback() {
    let answers = StubAnswers::empty();
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(answers);

    let activity = create_test_activity(ActivityKind::Message {
        text: "gibberish".to_string(),
    });
    handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await
        .unwrap();

    assert_eq!(transport.sent(), vec![NO_ANSWER_REPLY.to_string()]);
}

/// **Test: Conversation update with a newly joined user sends the greeting.**
///
/// **Setup:** Recipient is "bot1", first added member is "user42".
/// **Action:** `on_turn` with a ConversationUpdate activity.
/// **Expected:** Exactly one reply, equal to the greeting; the answer source is never called.
#[tokio::test]
async fn test_conversation_update_greets_new_member() {
    let answers = StubAnswers::empty();
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(answers.clone());

    let activity = create_test_activity(ActivityKind::ConversationUpdate {
        members_added: vec!["user42".to_string()],
    });
    handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await
        .unwrap();

    assert_eq!(transport.sent(), vec![GREETING_REPLY.to_string()]);
    assert_eq!(answers.calls.load(Ordering::SeqCst), 0);
}

/// **Test: Conversation update for the bot joining itself sends nothing.**
///
/// **Setup:** Recipient is "bot1", first added member is also "bot1".
/// **Action:** `on_turn`.
/// **Expected:** Ok, and no reply is sent.
#[tokio::test]
async fn test_conversation_update_for_bot_itself_sends_nothing() {
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(StubAnswers::empty());

    let activity = create_test_activity(ActivityKind::ConversationUpdate {
        members_added: vec!["bot1".to_string()],
    });
    handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await
        .unwrap();

    assert!(transport.sent().is_empty());
}

/// **Test: Only the first added member decides whether to greet.**
///
/// **Setup:** First added member is the bot, a user appears later in the list.
/// **Action:** `on_turn`.
/// **Expected:** No reply (the first element is the bot).
#[tokio::test]
async fn test_conversation_update_checks_only_first_member() {
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(StubAnswers::empty());

    let activity = create_test_activity(ActivityKind::ConversationUpdate {
        members_added: vec!["bot1".to_string(), "user42".to_string()],
    });
    handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await
        .unwrap();

    assert!(transport.sent().is_empty());
}

/// **Test: Other activity kinds are echoed back with the literal type tag.**
///
/// **Setup:** Activity of kind "Typing".
/// **Action:** `on_turn`.
/// **Expected:** Exactly one reply: `[Typing]-type activity detected.`
#[tokio::test]
async fn test_other_activity_reports_its_type() {
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(StubAnswers::empty());

    let activity = create_test_activity(ActivityKind::Other {
        kind: "Typing".to_string(),
    });
    handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await
        .unwrap();

    assert_eq!(
        transport.sent(),
        vec!["[Typing]-type activity detected.".to_string()]
    );
}

/// **Test: An answer source failure propagates and nothing is sent.**
///
/// **Setup:** Answer source that always fails.
/// **Action:** `on_turn` with a Message activity.
/// **Expected:** Err of the AnswerService variant; no reply sent.
#[tokio::test]
async fn test_answer_source_error_propagates() {
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(Arc::new(FailingAnswers));

    let activity = create_test_activity(ActivityKind::Message {
        text: "store hours".to_string(),
    });
    let result = handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await;

    assert!(matches!(result, Err(QbotError::AnswerService(_))));
    assert!(transport.sent().is_empty());
}

/// **Test: A conversation update without added members is a descriptive error.**
///
/// **Setup:** ConversationUpdate with an empty members_added list.
/// **Action:** `on_turn`.
/// **Expected:** Err(Handler(NoMembersAdded)); no reply sent.
#[tokio::test]
async fn test_conversation_update_without_members_is_an_error() {
    let transport = RecordingTransport::new();
    let handler = QnaTurnHandler::new(StubAnswers::empty());

    let activity = create_test_activity(ActivityKind::ConversationUpdate {
        members_added: Vec::new(),
    });
    let result = handler
        .on_turn(&TurnContext::new(activity, transport.clone()))
        .await;

    assert!(matches!(
        result,
        Err(QbotError::Handler(HandlerError::NoMembersAdded))
    ));
    assert!(transport.sent().is_empty());
}

// --- Helpers used by tests ---

/// Transport that records every sent reply.
struct RecordingTransport {
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send_activity(&self, _conversation: &Conversation, text: &str) -> CoreResult<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Answer source that returns a fixed result set and counts calls.
struct StubAnswers {
    answers: Vec<QnaAnswer>,
    calls: AtomicUsize,
}

impl StubAnswers {
    fn with_answers(answers: Vec<QnaAnswer>) -> Arc<Self> {
        Arc::new(Self {
            answers,
            calls: AtomicUsize::new(0),
        })
    }

    fn empty() -> Arc<Self> {
        Self::with_answers(Vec::new())
    }
}

#[async_trait::async_trait]
impl AnswerSource for StubAnswers {
    async fn generate_answer(&self, _question: &str) -> anyhow::Result<Vec<QnaAnswer>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answers.clone())
    }
}

/// Answer source that always fails, like a network or auth error would.
struct FailingAnswers;

#[async_trait::async_trait]
impl AnswerSource for FailingAnswers {
    async fn generate_answer(&self, _question: &str) -> anyhow::Result<Vec<QnaAnswer>> {
        anyhow::bail!("connection refused")
    }
}
