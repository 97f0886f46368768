//! Aegis NLP crate - message understanding for the security assistant.
//!
//! Every classifier is built from injected [`KeywordTables`] and is
//! stateless once constructed:
//! - Ranked rule-table intent classification with a keyword-density confidence
//! - Entity extraction (times, emails, URLs, IPv4 and MAC addresses)
//! - Multi-label topic, phrase, and action matching
//! - Six-way sentiment detection

pub mod analyzer;
pub mod entity;
pub mod error;
pub mod intent;
pub mod sentiment;
pub mod tables;
pub mod topic;
pub mod types;

pub use analyzer::MessageAnalyzer;
pub use entity::EntityExtractor;
pub use error::NlpError;
pub use intent::IntentClassifier;
pub use sentiment::SentimentDetector;
pub use tables::{IntentRule, KeywordTables, TopicEntry};
pub use topic::{ActionSuggester, PhraseDetector, TopicClassifier};
pub use types::{AnalysisResult, Entity, EntityType, Intent, Sentiment};
