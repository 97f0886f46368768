//! Chat sessions and the follow-up offer state machine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::selector::ResponseSelector;
use crate::state::DialogueState;

const YES_WORDS: [&str; 10] = [
    "yes", "y", "yeah", "yep", "yup", "sure", "ok", "okay", "please", "definitely",
];
const YES_PHRASES: [&str; 5] = ["of course", "go ahead", "go on", "why not", "tell me more"];
const NO_WORDS: [&str; 5] = ["no", "n", "nope", "nah", "skip"];
const NO_PHRASES: [&str; 5] = ["not now", "maybe later", "no thanks", "not really", "i'm good"];
/// Words that may pad an answer without changing it.
const FILLER_WORDS: [&str; 6] = ["thanks", "thank", "you", "pls", "then", "do"];

const MAX_CONFIRMATION_WORDS: usize = 5;

/// Reply when the user declines a follow-up tip.
pub const FOLLOW_UP_DECLINED: &str = "No problem! Feel free to ask me anything else.";

/// Where a session is in the ask / offer / confirm cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    AwaitingQuestion,
    /// A follow-up tip was offered and the next message may accept it.
    AwaitingFollowUpDecision { topic_key: String, display_name: String },
}

impl ConversationPhase {
    /// Phase after a reply: offer a follow-up when the reply was about a
    /// topic and offers are enabled.
    pub fn after_reply(state: &DialogueState, offers_enabled: bool) -> Self {
        match state.follow_up_topic() {
            Some((key, display)) if offers_enabled => Self::AwaitingFollowUpDecision {
                topic_key: key.to_string(),
                display_name: display.to_string(),
            },
            _ => Self::AwaitingQuestion,
        }
    }

    pub fn is_awaiting_follow_up(&self) -> bool {
        matches!(self, Self::AwaitingFollowUpDecision { .. })
    }
}

/// The prompt shown when a follow-up tip is on offer.
pub fn follow_up_offer(display_name: &str) -> String {
    format!(
        "Would you like a follow-up tip about {}? (yes/no)",
        display_name
    )
}

/// How a message answers a pending follow-up offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    /// Not a yes/no answer; treat as a new question.
    Other,
}

/// Decide whether `message` is a yes, a no, or something else.
///
/// Every word must be a yes/no word, part of a yes/no phrase, or filler.
/// Anything else ("ok what's 2fa") is a new question.
pub fn classify_confirmation(message: &str) -> Confirmation {
    let normalized: String = message
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_CONFIRMATION_WORDS {
        return Confirmation::Other;
    }

    let mut saw_yes = false;
    let mut saw_no = false;
    let mut rest = words.as_slice();
    while let Some(&word) = rest.first() {
        // Phrases first so "no thanks" and "why not" are read whole.
        if let Some(n) = phrase_len(rest, &NO_PHRASES) {
            saw_no = true;
            rest = &rest[n..];
            continue;
        }
        if let Some(n) = phrase_len(rest, &YES_PHRASES) {
            saw_yes = true;
            rest = &rest[n..];
            continue;
        }
        if NO_WORDS.contains(&word) {
            saw_no = true;
        } else if YES_WORDS.contains(&word) {
            saw_yes = true;
        } else if !FILLER_WORDS.contains(&word) {
            return Confirmation::Other;
        }
        rest = &rest[1..];
    }

    match (saw_yes, saw_no) {
        (true, false) => Confirmation::Yes,
        (false, true) => Confirmation::No,
        _ => Confirmation::Other,
    }
}

/// Word count of the phrase `words` starts with, if any.
fn phrase_len(words: &[&str], phrases: &[&str]) -> Option<usize> {
    phrases
        .iter()
        .map(|p| p.split(' ').collect::<Vec<&str>>())
        .find(|p| words.starts_with(p))
        .map(|p| p.len())
}

/// One conversation: dialogue memory, phase, and its own reply selector.
pub struct ChatSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub message_count: u64,
    pub state: DialogueState,
    pub phase: ConversationPhase,
    pub(crate) selector: ResponseSelector,
}

impl ChatSession {
    pub fn new(selector: ResponseSelector) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            message_count: 0,
            state: DialogueState::new(),
            phase: ConversationPhase::AwaitingQuestion,
            selector,
        }
    }

    /// True when idle for longer than `timeout_minutes` at `now`.
    pub fn is_expired(&self, timeout_minutes: u32, now: DateTime<Utc>) -> bool {
        now - self.last_message_at > Duration::minutes(i64::from(timeout_minutes))
    }

    pub(crate) fn touch(&mut self) {
        self.last_message_at = Utc::now();
        self.message_count += 1;
    }

    pub fn summary(&self) -> ChatSessionSummary {
        ChatSessionSummary {
            id: self.id,
            started_at: self.started_at,
            last_message_at: self.last_message_at,
            message_count: self.message_count,
            favorite_topic: self.state.favorite_topic().map(str::to_string),
        }
    }
}

/// Listing view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub message_count: u64,
    pub favorite_topic: Option<String>,
}
