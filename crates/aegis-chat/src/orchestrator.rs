//! Chat orchestrator: sessions, routing, follow-up offers, and activity.
//!
//! Each session is mutated under the session map lock, so one message is
//! processed start to finish before the next message for the same session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use aegis_core::config::{ActivityConfig, AegisConfig, DialogueConfig};
use aegis_core::ActivityLog;
use aegis_nlp::{AnalysisResult, Intent, KeywordTables, MessageAnalyzer};

use crate::error::ChatError;
use crate::responses::ResponseBank;
use crate::selector::ResponseSelector;
use crate::session::{
    classify_confirmation, follow_up_offer, ChatSession, ChatSessionSummary, Confirmation,
    ConversationPhase, FOLLOW_UP_DECLINED,
};
use crate::state::DialogueState;
use crate::task::{TaskDraft, TaskKind};

const ACTIVITY_CATEGORY: &str = "Chat";
const VIEW_LOGS_ACTION: &str = "view_logs";

const START_QUIZ_REPLY: &str = "Let's test your knowledge! Starting the security quiz.";
const QUIZ_RESULTS_REPLY: &str = "Here are your quiz results so far.";

/// What the caller should do with a turn besides showing the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "draft", rename_all = "snake_case")]
pub enum Route {
    Reply,
    CreateTask(TaskDraft),
    StartQuiz,
    ShowQuizResults,
    ShowActivityLog,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::CreateTask(_) => "create_task",
            Self::StartQuiz => "start_quiz",
            Self::ShowQuizResults => "show_quiz_results",
            Self::ShowActivityLog => "show_activity_log",
        }
    }
}

/// Result of handling one message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub session_id: Uuid,
    pub reply: String,
    pub route: Route,
    /// Absent for blank input and for answers to a follow-up offer.
    pub analysis: Option<AnalysisResult>,
    /// Set when a follow-up tip is on offer for the next message.
    pub follow_up_offer: Option<String>,
}

/// Central coordinator for chat sessions.
pub struct ChatOrchestrator {
    analyzer: Arc<MessageAnalyzer>,
    bank: Arc<ResponseBank>,
    activity: Arc<dyn ActivityLog>,
    sessions: Mutex<HashMap<Uuid, ChatSession>>,
    dialogue: DialogueConfig,
    activity_config: ActivityConfig,
    sessions_created: AtomicU64,
}

impl ChatOrchestrator {
    /// Orchestrator with the built-in tables and response bank.
    pub fn new(config: &AegisConfig, activity: Arc<dyn ActivityLog>) -> Result<Self, ChatError> {
        Self::with_tables(
            config,
            KeywordTables::builtin(),
            ResponseBank::builtin(),
            activity,
        )
    }

    /// Orchestrator over injected tables. Both are validated here so a
    /// topic without replies fails at startup, not mid-conversation.
    pub fn with_tables(
        config: &AegisConfig,
        tables: KeywordTables,
        bank: ResponseBank,
        activity: Arc<dyn ActivityLog>,
    ) -> Result<Self, ChatError> {
        let analyzer = MessageAnalyzer::new(&tables)?;
        bank.validate(&tables)?;
        info!(
            topics = tables.topics.len(),
            rules = tables.intent_rules.len(),
            seeded = config.dialogue.rng_seed.is_some(),
            "Chat orchestrator ready"
        );

        Ok(Self {
            analyzer: Arc::new(analyzer),
            bank: Arc::new(bank),
            activity,
            sessions: Mutex::new(HashMap::new()),
            dialogue: config.dialogue.clone(),
            activity_config: config.activity.clone(),
            sessions_created: AtomicU64::new(0),
        })
    }

    pub fn analyzer(&self) -> &MessageAnalyzer {
        &self.analyzer
    }

    /// Handle an incoming chat message.
    ///
    /// Unknown or expired session ids start a new session; the id in the
    /// returned turn is the one to use next time. Blank input never creates
    /// a session: its turn carries the live session's id, or the nil id.
    pub fn handle_message(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<ChatTurn, ChatError> {
        if message.trim().is_empty() {
            let live = self.live_session(session_id)?;
            debug!(live = live.is_some(), "Blank chat message");
            return Ok(ChatTurn {
                session_id: live.unwrap_or_else(Uuid::nil),
                reply: self.bank.clarification.clone(),
                route: Route::Reply,
                analysis: None,
                follow_up_offer: None,
            });
        }

        let (turn, action) = {
            let mut sessions = self.lock_sessions()?;
            let sid = self.resolve_session(&mut sessions, session_id);
            let session = sessions
                .get_mut(&sid)
                .ok_or(ChatError::SessionNotFound(sid))?;
            self.process(session, message)
        };

        if let Some(action) = action {
            self.record_activity(&action, message.trim());
        }

        debug!(
            session_id = %turn.session_id,
            route = turn.route.as_str(),
            offer = turn.follow_up_offer.is_some(),
            "Handled chat message"
        );
        Ok(turn)
    }

    /// Snapshot of a session's dialogue memory.
    pub fn get_dialogue_state(&self, session_id: Uuid) -> Result<DialogueState, ChatError> {
        let sessions = self.lock_sessions()?;
        sessions
            .get(&session_id)
            .map(|s| s.state.clone())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    pub fn get_phase(&self, session_id: Uuid) -> Result<ConversationPhase, ChatError> {
        let sessions = self.lock_sessions()?;
        sessions
            .get(&session_id)
            .map(|s| s.phase.clone())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    pub fn set_user_name(&self, session_id: Uuid, name: &str) -> Result<(), ChatError> {
        let mut sessions = self.lock_sessions()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        session.state.set_user_name(name.trim());
        Ok(())
    }

    /// All sessions, oldest first.
    pub fn list_sessions(&self) -> Vec<ChatSessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut summaries: Vec<ChatSessionSummary> =
            sessions.values().map(ChatSession::summary).collect();
        summaries.sort_by_key(|s| s.started_at);
        summaries
    }

    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self.lock_sessions()?;
        sessions
            .remove(&session_id)
            .map(|_| ())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    // -- Private helpers --

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, ChatSession>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::StateError(format!("session lock poisoned: {}", e)))
    }

    /// `requested`, if it names a session that has not expired.
    fn live_session(&self, requested: Option<Uuid>) -> Result<Option<Uuid>, ChatError> {
        let sessions = self.lock_sessions()?;
        let now = Utc::now();
        Ok(requested.filter(|sid| {
            sessions
                .get(sid)
                .is_some_and(|s| !s.is_expired(self.dialogue.session_timeout_minutes, now))
        }))
    }

    /// Reuse a live session or create a new one.
    fn resolve_session(
        &self,
        sessions: &mut HashMap<Uuid, ChatSession>,
        requested: Option<Uuid>,
    ) -> Uuid {
        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !session.is_expired(self.dialogue.session_timeout_minutes, Utc::now()) {
                    return sid;
                }
                info!(session_id = %sid, "Session expired, starting a new one");
                sessions.remove(&sid);
            }
        }

        let n = self.sessions_created.fetch_add(1, Ordering::Relaxed);
        let seed = self.dialogue.rng_seed.map(|s| s.wrapping_add(n));
        let selector =
            ResponseSelector::from_seed(Arc::clone(&self.bank), Arc::clone(&self.analyzer), seed);
        let session = ChatSession::new(selector);
        let sid = session.id;
        sessions.insert(sid, session);
        sid
    }

    /// Process one non-blank message inside the session's critical section.
    /// Returns the turn and the activity action to record, if any.
    fn process(&self, session: &mut ChatSession, message: &str) -> (ChatTurn, Option<String>) {
        let sid = session.id;
        let trimmed = message.trim();

        session.touch();

        if let ConversationPhase::AwaitingFollowUpDecision { topic_key, .. } = &session.phase {
            let topic_key = topic_key.clone();
            let decision = classify_confirmation(trimmed);
            session.phase = ConversationPhase::AwaitingQuestion;

            let answered = match decision {
                Confirmation::Yes => Some((
                    session
                        .selector
                        .follow_up(&topic_key)
                        .unwrap_or_else(|| self.bank.apology.clone()),
                    "follow_up_accepted",
                )),
                Confirmation::No => Some((FOLLOW_UP_DECLINED.to_string(), "follow_up_declined")),
                Confirmation::Other => None,
            };

            if let Some((reply, action)) = answered {
                debug!(session_id = %sid, topic = %topic_key, action, "Follow-up answered");
                let turn = ChatTurn {
                    session_id: sid,
                    reply,
                    route: Route::Reply,
                    analysis: None,
                    follow_up_offer: None,
                };
                return (turn, Some(action.to_string()));
            }
        }

        let analysis = self.analyzer.analyze(message);
        let action = analysis.intent.as_str().to_string();

        let routed = match analysis.intent {
            Intent::CreateTask | Intent::SetReminder => TaskDraft::from_analysis(&analysis)
                .map(|draft| (task_reply(&draft), Route::CreateTask(draft))),
            Intent::StartQuiz => Some((START_QUIZ_REPLY.to_string(), Route::StartQuiz)),
            Intent::QuizResults => Some((QUIZ_RESULTS_REPLY.to_string(), Route::ShowQuizResults)),
            _ => None,
        };

        let (reply, route, follow_up) = match routed {
            Some((reply, route)) => {
                session.phase = ConversationPhase::AwaitingQuestion;
                (reply, route, None)
            }
            None => {
                let topic_replies_before = session.state.total_topic_interest();
                let reply = session.selector.respond(&mut session.state, message);
                let topic_reply = session.state.total_topic_interest() > topic_replies_before;

                session.phase = if topic_reply {
                    ConversationPhase::after_reply(&session.state, self.dialogue.follow_up_offers)
                } else {
                    ConversationPhase::AwaitingQuestion
                };
                let follow_up = match &session.phase {
                    ConversationPhase::AwaitingFollowUpDecision { display_name, .. } => {
                        Some(follow_up_offer(display_name))
                    }
                    ConversationPhase::AwaitingQuestion => None,
                };

                let route = if analysis
                    .suggested_actions
                    .iter()
                    .any(|a| a == VIEW_LOGS_ACTION)
                {
                    Route::ShowActivityLog
                } else {
                    Route::Reply
                };
                (reply, route, follow_up)
            }
        };

        let turn = ChatTurn {
            session_id: sid,
            reply,
            route,
            analysis: Some(analysis),
            follow_up_offer: follow_up,
        };
        (turn, Some(action))
    }

    /// Report to the activity sink. Failures are logged and swallowed.
    fn record_activity(&self, action: &str, message: &str) {
        if !self.activity_config.enabled {
            return;
        }
        let details: String = message
            .chars()
            .take(self.activity_config.details_max_chars)
            .collect();
        if let Err(e) = self
            .activity
            .log_activity(ACTIVITY_CATEGORY, action, &details)
        {
            warn!(error = %e, action, "Activity log write failed");
        }
    }
}

fn task_reply(draft: &TaskDraft) -> String {
    let noun = match draft.kind {
        TaskKind::Task => "task",
        TaskKind::Reminder => "reminder",
    };
    match &draft.due {
        Some(due) => format!(
            "I've drafted a {}: '{}' ({}). Review it in your task list to save it.",
            noun, draft.title, due
        ),
        None => format!(
            "I've drafted a {}: '{}'. Review it in your task list to save it.",
            noun, draft.title
        ),
    }
}

// =============================================================================
// Tests
// =============================================================================
