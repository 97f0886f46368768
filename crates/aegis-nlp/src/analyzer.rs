//! Runs every classifier over one message and merges the results.

use chrono::Utc;
use tracing::debug;

use crate::entity::EntityExtractor;
use crate::error::NlpError;
use crate::intent::IntentClassifier;
use crate::sentiment::SentimentDetector;
use crate::tables::KeywordTables;
use crate::topic::{ActionSuggester, PhraseDetector, TopicClassifier};
use crate::types::AnalysisResult;

/// Stateless message analyzer.
///
/// Entities are extracted from the raw text so offsets index the original
/// message. Every other classifier sees the trimmed, lowercased text.
pub struct MessageAnalyzer {
    intents: IntentClassifier,
    entities: EntityExtractor,
    topics: TopicClassifier,
    phrases: PhraseDetector,
    actions: ActionSuggester,
    sentiment: SentimentDetector,
}

impl MessageAnalyzer {
    /// Validate the tables and build every classifier from them.
    pub fn new(tables: &KeywordTables) -> Result<Self, NlpError> {
        tables.validate()?;
        Ok(Self {
            intents: IntentClassifier::new(tables)?,
            entities: EntityExtractor::new(),
            topics: TopicClassifier::new(tables),
            phrases: PhraseDetector::new(tables),
            actions: ActionSuggester::new(tables),
            sentiment: SentimentDetector::new(tables),
        })
    }

    pub fn analyze(&self, message: &str) -> AnalysisResult {
        let normalized = message.trim().to_lowercase();
        let (intent, confidence) = self.intents.classify_with_confidence(&normalized);

        let result = AnalysisResult {
            original_message: message.to_string(),
            intent,
            confidence,
            entities: self.entities.extract(message),
            topics: self.topics.classify(&normalized),
            detected_phrases: self.phrases.detect(&normalized),
            suggested_actions: self.actions.suggest(&normalized),
            sentiment: self.sentiment.detect(&normalized),
            processed_at: Utc::now(),
        };

        debug!(
            intent = %result.intent,
            confidence = result.confidence,
            entities = result.entities.len(),
            topics = ?result.topics,
            sentiment = result.sentiment.as_str(),
            "Analyzed message"
        );

        result
    }

    /// The topic classifier, for callers that need single-label lookups.
    pub fn topics(&self) -> &TopicClassifier {
        &self.topics
    }

    pub fn sentiment(&self) -> &SentimentDetector {
        &self.sentiment
    }
}
