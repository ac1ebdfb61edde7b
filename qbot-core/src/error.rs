use thiserror::Error;

#[derive(Error, Debug)]
pub enum QbotError {
    #[error("Answer service error: {0}")]
    AnswerService(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Conversation update carries no added members")]
    NoMembersAdded,
}

pub type Result<T> = std::result::Result<T, QbotError>;
