//! Keyword, phrase, and rule tables.
//!
//! Pure data. Every table is an ordered `Vec` because order is meaningful:
//! the intent rule list is a ranked priority list, the topic list decides
//! first-match response selection and favorite-topic tie-breaks, and the
//! sentiment list is evaluated top to bottom.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::NlpError;
use crate::types::{Intent, Sentiment};

/// A subject-matter topic and the keywords that signal it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub key: String,
    pub display_name: String,
    pub keywords: Vec<String>,
}

/// One row of the ranked intent rule table.
///
/// `pattern` is a regex evaluated case-insensitively over the lowercased
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    pub intent: Intent,
    pub pattern: String,
}

/// All static tables the classifiers are built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTables {
    pub topics: Vec<TopicEntry>,
    /// Returned by the multi-label topic classifier when nothing hits.
    pub default_topic: String,
    pub intent_rules: Vec<IntentRule>,
    pub intent_keywords: Vec<(Intent, Vec<String>)>,
    pub phrase_categories: Vec<(String, Vec<String>)>,
    pub actions: Vec<(String, Vec<String>)>,
    /// Priority order; `Neutral` is implicit and never listed.
    pub sentiments: Vec<(Sentiment, Vec<String>)>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn topic(key: &str, display_name: &str, keywords: &[&str]) -> TopicEntry {
    TopicEntry {
        key: key.to_string(),
        display_name: display_name.to_string(),
        keywords: words(keywords),
    }
}

fn rules<'a>(intent: Intent, patterns: &'a [&'a str]) -> impl Iterator<Item = IntentRule> + 'a {
    patterns.iter().map(move |p| IntentRule {
        intent,
        pattern: p.to_string(),
    })
}

/// Every list must be non-empty and free of blank entries.
fn check_entries(kind: &str, name: &str, entries: &[String]) -> Result<(), NlpError> {
    if entries.is_empty() {
        return Err(NlpError::InvalidTable(format!("{} {} has no entries", kind, name)));
    }
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(NlpError::InvalidTable(format!("{} {} has a blank entry", kind, name)));
    }
    Ok(())
}

impl KeywordTables {
    /// The shipped tables for the security-awareness assistant.
    pub fn builtin() -> Self {
        let topics = vec![
            topic(
                "password",
                "Password Security",
                &["password", "passphrase", "passcode", "credential"],
            ),
            topic(
                "phishing",
                "Phishing",
                &["phishing", "phish", "suspicious email", "suspicious link", "scam"],
            ),
            topic(
                "two_factor",
                "Two-Factor Authentication",
                &["2fa", "two-factor", "two factor", "mfa", "multi-factor", "authenticator"],
            ),
            topic(
                "malware",
                "Malware",
                &["malware", "virus", "ransomware", "trojan", "spyware"],
            ),
            topic("vpn", "VPNs", &["vpn", "virtual private network"]),
            topic(
                "wifi",
                "Wi-Fi Security",
                &["wifi", "wi-fi", "wireless", "router", "hotspot"],
            ),
            topic(
                "encryption",
                "Encryption",
                &["encrypt", "cipher", "ssl", "end-to-end"],
            ),
            topic("firewall", "Firewalls", &["firewall"]),
            topic(
                "updates",
                "Software Updates",
                &["update", "patch", "upgrade"],
            ),
            topic("backup", "Data Backups", &["backup", "back up", "restore"]),
            topic(
                "social_engineering",
                "Social Engineering",
                &["social engineering", "pretext", "impersonat", "tailgating"],
            ),
            topic(
                "privacy",
                "Online Privacy",
                &["privacy", "private data", "tracking", "cookie", "personal information"],
            ),
            topic(
                "network",
                "Network Security",
                &["network", "ip address", "mac address", "port scan", "ddos"],
            ),
        ];

        // Ranked: the first matching rule wins, so task creation and
        // reminders precede quiz rules, which precede information and help,
        // then memory recall, then security assessment.
        let mut intent_rules = Vec::new();
        intent_rules.extend(rules(
            Intent::CreateTask,
            &[
                r"\b(?:create|add|make|new)\s+(?:a\s+)?(?:new\s+)?(?:task|todo|to-do)\b",
                r"\btask\s*:",
                r"\badd\s+.+\s+to\s+my\s+(?:tasks|list|to-?do)\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::SetReminder,
            &[
                r"\bremind\s+me\b",
                r"\bset\s+(?:a\s+|an\s+)?(?:reminder|alarm)\b",
                r"\bdon'?t\s+let\s+me\s+forget\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::StartQuiz,
            &[
                r"\b(?:start|take|begin|launch|do)\s+(?:a\s+|the\s+)?(?:security\s+)?quiz\b",
                r"\bquiz\s+me\b",
                r"\btest\s+my\s+knowledge\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::QuizResults,
            &[
                r"\bquiz\s+(?:results?|scores?|history)\b",
                r"\bmy\s+(?:quiz\s+)?scores?\b",
                r"\bhow\s+did\s+i\s+do\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::InformationRequest,
            &[
                r"\bwhat\s+(?:is|are)\b",
                r"\bwhat'?s\s+(?:a|an|the)\b",
                r"\btell\s+me\s+about\b",
                r"\bexplain\b",
                r"\bhow\s+(?:do|does|should|can)\s+(?:i|we|it)\b",
                r"\bdefin(?:e|ition)\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::HelpRequest,
            &[
                r"\bhelp\b",
                r"\bwhat\s+can\s+you\s+do\b",
                r"\bsupport\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::MemoryRecall,
            &[
                r"\b(?:last|previous)\s+question\b",
                r"\bconversation\s+history\b",
                r"\bwhat\s+did\s+we\s+(?:talk|chat)\s+about\b",
                r"\bfavou?rite\b",
                r"\bmost\s+interested\b",
                r"\bdo\s+you\s+remember\b",
            ],
        ));
        intent_rules.extend(rules(
            Intent::SecurityAssessment,
            &[
                r"\bam\s+i\s+(?:safe|secure|protected)\b",
                r"\bsecurity\s+(?:check|assessment|audit|score|review)\b",
                r"\b(?:assess|audit|scan|evaluate)\b",
                r"\bis\s+my\s+\w+(?:\s+\w+)?\s+(?:safe|secure|strong)\b",
                r"\bvulnerab",
            ],
        ));

        let intent_keywords = vec![
            (
                Intent::CreateTask,
                words(&["create", "task", "add", "todo", "new", "list"]),
            ),
            (
                Intent::SetReminder,
                words(&["remind", "reminder", "alarm", "tomorrow", "later", "forget"]),
            ),
            (
                Intent::StartQuiz,
                words(&["quiz", "start", "test", "knowledge", "challenge"]),
            ),
            (
                Intent::QuizResults,
                words(&["quiz", "result", "score", "did i do", "history"]),
            ),
            (
                Intent::InformationRequest,
                words(&["what", "how", "explain", "tell me", "about", "why"]),
            ),
            (
                Intent::HelpRequest,
                words(&["help", "support", "assist", "can you", "stuck"]),
            ),
            (
                Intent::MemoryRecall,
                words(&[
                    "last",
                    "previous",
                    "question",
                    "remember",
                    "favorite",
                    "history",
                    "talk about",
                ]),
            ),
            (
                Intent::SecurityAssessment,
                words(&["safe", "secure", "assess", "audit", "scan", "vulnerab", "risk"]),
            ),
        ];

        let phrase_categories = vec![
            (
                "Security Concerns".to_string(),
                words(&[
                    "i think i was hacked",
                    "i got hacked",
                    "suspicious email",
                    "suspicious link",
                    "strange login",
                    "data breach",
                    "stolen password",
                    "clicked a link",
                ]),
            ),
            (
                "Task Requests".to_string(),
                words(&[
                    "remind me",
                    "create a task",
                    "add a task",
                    "start quiz",
                    "start a quiz",
                    "take a quiz",
                    "quiz me",
                ]),
            ),
            (
                "Learning Requests".to_string(),
                words(&["tell me about", "explain", "what is", "how do i", "teach me"]),
            ),
            (
                "Greetings".to_string(),
                words(&[
                    "hello",
                    "hi there",
                    "hey there",
                    "good morning",
                    "good afternoon",
                    "good evening",
                ]),
            ),
            (
                "Gratitude".to_string(),
                words(&["thank you", "thanks", "appreciate it"]),
            ),
            (
                "Help Requests".to_string(),
                words(&["help me", "i need help", "can you help", "what can you do"]),
            ),
        ];

        let actions = vec![
            (
                "create_task".to_string(),
                words(&["remind me", "create a task", "add a task", "to-do", "todo"]),
            ),
            (
                "start_quiz".to_string(),
                words(&["quiz", "test my knowledge", "test me"]),
            ),
            (
                "view_logs".to_string(),
                words(&[
                    "activity log",
                    "show logs",
                    "view logs",
                    "show my activity",
                    "log history",
                ]),
            ),
            (
                "run_security_check".to_string(),
                words(&[
                    "am i safe",
                    "security check",
                    "security assessment",
                    "audit",
                    "vulnerab",
                ]),
            ),
            (
                "update_passwords".to_string(),
                words(&["password", "hacked", "breach", "credential"]),
            ),
            (
                "enable_two_factor".to_string(),
                words(&["2fa", "two-factor", "two factor", "mfa", "account security"]),
            ),
            (
                "report_phishing".to_string(),
                words(&["phishing", "suspicious email", "suspicious link", "scam"]),
            ),
        ];

        let sentiments = vec![
            (
                Sentiment::Worried,
                words(&[
                    "worried", "worry", "scared", "afraid", "concerned", "nervous", "anxious",
                    "hacked", "panic",
                ]),
            ),
            (
                Sentiment::Curious,
                words(&[
                    "curious",
                    "wondering",
                    "i wonder",
                    "interested in",
                    "tell me more",
                    "fascinat",
                ]),
            ),
            (
                Sentiment::Frustrated,
                words(&[
                    "frustrated",
                    "frustrating",
                    "annoying",
                    "annoyed",
                    "angry",
                    "fed up",
                    "not working",
                    "doesn't work",
                ]),
            ),
            (
                Sentiment::Happy,
                words(&["great", "awesome", "happy", "glad", "excellent", "love", "cool", "nice"]),
            ),
            (
                Sentiment::Confused,
                words(&[
                    "confused",
                    "confusing",
                    "don't understand",
                    "do not understand",
                    "unclear",
                    "makes no sense",
                ]),
            ),
        ];

        Self {
            topics,
            default_topic: "general".to_string(),
            intent_rules,
            intent_keywords,
            phrase_categories,
            actions,
            sentiments,
        }
    }

    /// Check structural invariants: unique non-empty topic keys, no empty
    /// or blank entries in any keyword list, and no `Neutral` row in the
    /// sentiment table.
    ///
    /// A blank keyword is a substring of every message, so it is rejected.
    pub fn validate(&self) -> Result<(), NlpError> {
        if self.default_topic.trim().is_empty() {
            return Err(NlpError::InvalidTable("default topic is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.topics {
            if entry.key.trim().is_empty() {
                return Err(NlpError::InvalidTable("topic with empty key".to_string()));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(NlpError::InvalidTable(format!(
                    "duplicate topic key: {}",
                    entry.key
                )));
            }
            check_entries("topic", &entry.key, &entry.keywords)?;
        }

        for (intent, keywords) in &self.intent_keywords {
            check_entries("intent", intent.as_str(), keywords)?;
        }
        for (category, phrases) in &self.phrase_categories {
            check_entries("phrase category", category, phrases)?;
        }
        for (action, triggers) in &self.actions {
            check_entries("action", action, triggers)?;
        }
        for (sentiment, keywords) in &self.sentiments {
            check_entries("sentiment", sentiment.as_str(), keywords)?;
        }

        if self
            .sentiments
            .iter()
            .any(|(s, _)| *s == Sentiment::Neutral)
        {
            return Err(NlpError::InvalidTable(
                "neutral is the default sentiment and cannot be listed".to_string(),
            ));
        }

        Ok(())
    }

    /// Topic keys in table order.
    pub fn topic_order(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.key.as_str()).collect()
    }

    /// Look up a topic by key.
    pub fn topic(&self, key: &str) -> Option<&TopicEntry> {
        self.topics.iter().find(|t| t.key == key)
    }
}
