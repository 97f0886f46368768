//! Task and reminder drafts for the task-creation consumer.
//!
//! The core never persists tasks. It pre-fills a draft from the analyzed
//! message: a title pulled from the text after the request phrase, and the
//! TIME entities as the due hint.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use aegis_nlp::{AnalysisResult, Entity, EntityType, Intent};

/// Title extraction patterns. The first with a capture wins.
static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bremind\s+me\s+(?:to|about)\b(.+)",
        r"(?i)\bset\s+(?:a\s+|an\s+)?(?:reminder|alarm)\s+(?:to|for|about)\b(.+)",
        r"(?i)\bdon'?t\s+let\s+me\s+forget\s+(?:to|about)\b(.+)",
        r"(?i)\b(?:create|add|make)\s+(?:a\s+)?(?:new\s+)?(?:task|todo|to-do)\s+(?:to|for|about)\b(.+)",
        r"(?i)\b(?:task|todo|to-do)\s*:\s*(.+)",
        r"(?i)\badd\s+(.+?)\s+to\s+my\s+(?:tasks|list|to-?do)\b",
        r"(?i)\bremind\s+me\b(.*)",
        r"(?i)\b(?:create|add|make|new)\s+(?:a\s+)?(?:new\s+)?(?:task|todo|to-do)\b(.*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid task title regex"))
    .collect()
});

/// Words left dangling at the end of a title once times are removed.
const DANGLING: [&str; 7] = ["at", "on", "by", "in", "for", "before", "until"];
/// Connectives left at the start when a time sits between "remind me" and
/// the task.
const LEADING: [&str; 6] = ["to", "about", "that", "at", "on", "by"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Task,
    Reminder,
}

/// Pre-filled task form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub kind: TaskKind,
    pub title: String,
    /// Value of the first TIME entity.
    pub due: Option<String>,
    pub time_entities: Vec<Entity>,
}

impl TaskDraft {
    /// Build a draft for task and reminder intents; `None` otherwise.
    pub fn from_analysis(result: &AnalysisResult) -> Option<Self> {
        let kind = match result.intent {
            Intent::SetReminder => TaskKind::Reminder,
            Intent::CreateTask => TaskKind::Task,
            _ => return None,
        };

        let time_entities: Vec<Entity> = result.entities_of(EntityType::Time).cloned().collect();
        let message = result.original_message.as_str();

        let title = extract_title(message)
            .map(|raw| clean_title(raw, &time_entities))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| clean_title(message, &time_entities));

        Some(Self {
            kind,
            title,
            due: time_entities.first().map(|e| e.value.clone()),
            time_entities,
        })
    }
}

fn extract_title(message: &str) -> Option<&str> {
    TITLE_PATTERNS
        .iter()
        .filter_map(|re| re.captures(message))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|s| !s.trim().is_empty())
}

fn clean_title(raw: &str, times: &[Entity]) -> String {
    let mut title = raw.to_string();
    for time in times {
        title = title.replace(&time.value, " ");
    }

    let is_in = |word: &str, list: &[&str]| {
        let bare = word.trim_matches(|c: char| c.is_ascii_punctuation());
        bare.is_empty() || list.contains(&bare.to_lowercase().as_str())
    };

    let mut words: Vec<&str> = title.split_whitespace().collect();
    while words.last().is_some_and(|w| is_in(*w, &DANGLING)) {
        words.pop();
    }
    let start = words
        .iter()
        .position(|w| !is_in(*w, &LEADING))
        .unwrap_or(words.len());

    words[start..]
        .join(" ")
        .trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_nlp::{KeywordTables, MessageAnalyzer};

    fn draft(message: &str) -> Option<TaskDraft> {
        let analyzer = MessageAnalyzer::new(&KeywordTables::builtin()).unwrap();
        TaskDraft::from_analysis(&analyzer.analyze(message))
    }

    #[test]
    fn test_reminder_with_times() {
        let d = draft("Remind me to patch the router tomorrow at 9:30 am").unwrap();
        assert_eq!(d.kind, TaskKind::Reminder);
        assert_eq!(d.title, "patch the router");
        assert_eq!(d.due.as_deref(), Some("tomorrow"));
        assert_eq!(d.time_entities.len(), 2);
    }

    #[test]
    fn test_create_task_title() {
        let d = draft("Create a task to enable 2FA on my email").unwrap();
        assert_eq!(d.kind, TaskKind::Task);
        assert_eq!(d.title, "enable 2FA on my email");
        assert!(d.due.is_none());
    }

    #[test]
    fn test_task_marker() {
        let d = draft("task: rotate API keys next week.").unwrap();
        assert_eq!(d.title, "rotate API keys");
        assert_eq!(d.due.as_deref(), Some("next week"));
    }

    #[test]
    fn test_add_to_my_list() {
        let d = draft("add patch laptop to my list").unwrap();
        assert_eq!(d.kind, TaskKind::Task);
        assert_eq!(d.title, "patch laptop");
    }

    #[test]
    fn test_quiz_inside_reminder_stays_a_reminder() {
        let d = draft("remind me to start quiz tomorrow").unwrap();
        assert_eq!(d.kind, TaskKind::Reminder);
        assert_eq!(d.title, "start quiz");
    }

    #[test]
    fn test_time_before_task_drops_leading_connective() {
        let d = draft("remind me tomorrow to patch the router").unwrap();
        assert_eq!(d.title, "patch the router");
        assert_eq!(d.due.as_deref(), Some("tomorrow"));

        let d = draft("Remind me at 9:30 about the backup drive").unwrap();
        assert_eq!(d.title, "the backup drive");
    }

    #[test]
    fn test_fallback_to_whole_message() {
        let d = draft("remind me tomorrow").unwrap();
        assert_eq!(d.title, "remind me");
        assert_eq!(d.due.as_deref(), Some("tomorrow"));
    }

    #[test]
    fn test_non_task_intent_has_no_draft() {
        assert!(draft("what is phishing").is_none());
        assert!(draft("start a quiz").is_none());
    }
}
