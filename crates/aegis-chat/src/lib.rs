//! Conversational layer for Aegis.
//!
//! Provides per-session dialogue memory, reply selection, the follow-up
//! offer state machine, task-draft extraction, and the orchestrator that
//! routes analyzed messages to replies or caller actions.

pub mod error;
pub mod orchestrator;
pub mod responses;
pub mod selector;
pub mod session;
pub mod state;
pub mod task;

pub use error::ChatError;
pub use orchestrator::{ChatOrchestrator, ChatTurn, Route};
pub use responses::{ConversationalPattern, ResponseBank};
pub use selector::ResponseSelector;
pub use session::{
    classify_confirmation, ChatSession, ChatSessionSummary, Confirmation, ConversationPhase,
};
pub use state::{DialogueState, LastTopic};
pub use task::{TaskDraft, TaskKind};
