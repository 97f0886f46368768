//! Substring-containment classifiers: topics, literal phrases, and actions.
//!
//! All three are multi-label, case-insensitive, and scan the whole message.
//! They do not share state with each other.

use crate::tables::{KeywordTables, TopicEntry};

fn any_hit(lower: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

fn lowercase_all(list: &[String]) -> Vec<String> {
    list.iter().map(|k| k.to_lowercase()).collect()
}

/// Keyword topic matcher.
///
/// Two lookups over the same ordered table:
/// - [`classify`](Self::classify) is multi-label and feeds `AnalysisResult.topics`.
/// - [`first_match`](Self::first_match) is single-label and drives reply
///   selection and interest counting.
///
/// A message mentioning both "password" and "vpn" lists both topics in its
/// analysis but only counts toward `password` in dialogue memory, because
/// `password` comes first in the table.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    topics: Vec<TopicEntry>,
    default_topic: String,
}

impl TopicClassifier {
    pub fn new(tables: &KeywordTables) -> Self {
        Self {
            topics: tables
                .topics
                .iter()
                .map(|t| TopicEntry {
                    key: t.key.clone(),
                    display_name: t.display_name.clone(),
                    keywords: lowercase_all(&t.keywords),
                })
                .collect(),
            default_topic: tables.default_topic.clone(),
        }
    }

    /// Every topic key with a keyword hit, in table order, or the default
    /// topic when nothing hits. Never empty.
    pub fn classify(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let hits: Vec<String> = self
            .topics
            .iter()
            .filter(|t| any_hit(&lower, &t.keywords))
            .map(|t| t.key.clone())
            .collect();

        if hits.is_empty() {
            vec![self.default_topic.clone()]
        } else {
            hits
        }
    }

    /// First topic in table order with a keyword hit.
    pub fn first_match(&self, text: &str) -> Option<&TopicEntry> {
        let lower = text.to_lowercase();
        self.topics.iter().find(|t| any_hit(&lower, &t.keywords))
    }

    /// Topic keys in table order.
    pub fn topic_order(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.key.as_str()).collect()
    }

    pub fn topic(&self, key: &str) -> Option<&TopicEntry> {
        self.topics.iter().find(|t| t.key == key)
    }

    /// Display name for a topic key, or the key itself when unknown.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.topic(key)
            .map(|t| t.display_name.as_str())
            .unwrap_or(key)
    }
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::new(&KeywordTables::builtin())
    }
}

/// Finds curated literal phrases, reported as `"Category: phrase"`.
#[derive(Debug, Clone)]
pub struct PhraseDetector {
    categories: Vec<(String, Vec<String>)>,
}

impl PhraseDetector {
    pub fn new(tables: &KeywordTables) -> Self {
        Self {
            categories: tables
                .phrase_categories
                .iter()
                .map(|(c, phrases)| (c.clone(), lowercase_all(phrases)))
                .collect(),
        }
    }

    pub fn detect(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .flat_map(|(category, phrases)| {
                phrases
                    .iter()
                    .filter(|p| lower.contains(p.as_str()))
                    .map(move |p| format!("{}: {}", category, p))
            })
            .collect()
    }
}

impl Default for PhraseDetector {
    fn default() -> Self {
        Self::new(&KeywordTables::builtin())
    }
}

/// Suggests follow-on actions whose trigger phrases occur in the message.
#[derive(Debug, Clone)]
pub struct ActionSuggester {
    actions: Vec<(String, Vec<String>)>,
}

impl ActionSuggester {
    pub fn new(tables: &KeywordTables) -> Self {
        Self {
            actions: tables
                .actions
                .iter()
                .map(|(a, triggers)| (a.clone(), lowercase_all(triggers)))
                .collect(),
        }
    }

    pub fn suggest(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.actions
            .iter()
            .filter(|(_, triggers)| any_hit(&lower, triggers))
            .map(|(action, _)| action.clone())
            .collect()
    }
}

impl Default for ActionSuggester {
    fn default() -> Self {
        Self::new(&KeywordTables::builtin())
    }
}
