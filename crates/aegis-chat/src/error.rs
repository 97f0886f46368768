//! Error types for the chat engine.

use aegis_core::error::AegisError;
use aegis_nlp::NlpError;

/// Errors from the chat engine.
///
/// Blank input is not an error; it produces the clarification reply.
/// The table errors are raised at construction, never per message.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no responses for topic: {0}")]
    MissingResponses(String),
    #[error("no follow-up tips for topic: {0}")]
    MissingFollowUps(String),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("session state error: {0}")]
    StateError(String),
    #[error("nlp error: {0}")]
    Nlp(#[from] NlpError),
    #[error("core error: {0}")]
    Core(#[from] AegisError),
}
