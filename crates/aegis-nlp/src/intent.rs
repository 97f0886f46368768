//! Ranked rule-table intent classification.
//!
//! Rules are evaluated top to bottom over the lowercased message and the
//! first match wins. Priority lives in the table, not in control flow, so
//! reordering the table is the only way to change precedence.

use regex::{Regex, RegexBuilder};

use crate::error::NlpError;
use crate::tables::KeywordTables;
use crate::types::Intent;

/// Confidence for intents without a keyword list, including `GeneralChat`.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Added to the keyword density before clamping to 1.0.
const CONFIDENCE_BASE: f32 = 0.3;

struct CompiledRule {
    intent: Intent,
    regex: Regex,
}

/// First-match intent classifier with a keyword-density confidence score.
pub struct IntentClassifier {
    rules: Vec<CompiledRule>,
    keywords: Vec<(Intent, Vec<String>)>,
}

impl IntentClassifier {
    /// Compile the ranked rule table.
    pub fn new(tables: &KeywordTables) -> Result<Self, NlpError> {
        let rules = tables
            .intent_rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| CompiledRule {
                        intent: rule.intent,
                        regex,
                    })
                    .map_err(|e| NlpError::InvalidPattern {
                        intent: rule.intent.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let keywords = tables
            .intent_keywords
            .iter()
            .map(|(intent, kws)| (*intent, kws.iter().map(|k| k.to_lowercase()).collect()))
            .collect();

        Ok(Self { rules, keywords })
    }

    /// Index of the first rule matching `text`, if any.
    pub fn matched_rule(&self, text: &str) -> Option<usize> {
        let lower = text.to_lowercase();
        self.rules.iter().position(|r| r.regex.is_match(&lower))
    }

    /// Classify the intent of a message. Falls back to `GeneralChat`.
    pub fn classify(&self, text: &str) -> Intent {
        self.matched_rule(text)
            .map(|idx| self.rules[idx].intent)
            .unwrap_or(Intent::GeneralChat)
    }

    /// Keyword-density confidence for `intent` over `text`.
    ///
    /// `min(1.0, hits / keywords + 0.3)` for intents with a keyword list,
    /// [`DEFAULT_CONFIDENCE`] otherwise. This does not check which rule
    /// fired; it only measures how many of the intent's keywords appear.
    pub fn confidence(&self, text: &str, intent: Intent) -> f32 {
        let Some((_, keywords)) = self
            .keywords
            .iter()
            .find(|(i, kws)| *i == intent && !kws.is_empty())
        else {
            return DEFAULT_CONFIDENCE;
        };

        let lower = text.to_lowercase();
        let hits = keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .count();
        (hits as f32 / keywords.len() as f32 + CONFIDENCE_BASE).min(1.0)
    }

    /// Classify and score in one call.
    pub fn classify_with_confidence(&self, text: &str) -> (Intent, f32) {
        let intent = self.classify(text);
        (intent, self.confidence(text, intent))
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(&KeywordTables::builtin()).expect("Invalid builtin intent rules")
    }
}
