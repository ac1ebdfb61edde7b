//! # qbot-core
//!
//! Core types and traits for the QnA bot: [`Activity`], [`Transport`], [`TurnContext`],
//! error taxonomy, and tracing initialization. Transport-agnostic; used by qna-handlers and qbot-cli.

pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use error::{HandlerError, QbotError, Result};
pub use logger::init_tracing;
pub use transport::{ConsoleTransport, Transport, TurnContext};
pub use types::{Activity, ActivityKind, Conversation};
