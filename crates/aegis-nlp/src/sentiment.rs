//! Keyword-based sentiment detection.

use crate::tables::KeywordTables;
use crate::types::Sentiment;

/// Six-way tone classifier.
///
/// Categories are tested in table order (worried, curious, frustrated,
/// happy, confused); the first with a keyword substring hit wins and
/// `Neutral` is the fallback.
#[derive(Debug, Clone)]
pub struct SentimentDetector {
    categories: Vec<(Sentiment, Vec<String>)>,
}

impl SentimentDetector {
    pub fn new(tables: &KeywordTables) -> Self {
        Self {
            categories: tables
                .sentiments
                .iter()
                .map(|(s, kws)| (*s, kws.iter().map(|k| k.to_lowercase()).collect()))
                .collect(),
        }
    }

    pub fn detect(&self, text: &str) -> Sentiment {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(s, _)| *s)
            .unwrap_or(Sentiment::Neutral)
    }
}

impl Default for SentimentDetector {
    fn default() -> Self {
        Self::new(&KeywordTables::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SentimentDetector {
        SentimentDetector::default()
    }

    #[test]
    fn test_worried_beats_happy() {
        assert_eq!(
            detector().detect("I'm worried, even though the update looked great"),
            Sentiment::Worried
        );
    }

    #[test]
    fn test_each_category() {
        let d = detector();
        assert_eq!(d.detect("I'm scared my account was hacked"), Sentiment::Worried);
        assert_eq!(d.detect("I'm curious how VPNs work"), Sentiment::Curious);
        assert_eq!(d.detect("my router is not working again"), Sentiment::Frustrated);
        assert_eq!(d.detect("awesome, thank you"), Sentiment::Happy);
        assert_eq!(d.detect("I'm confused about 2FA"), Sentiment::Confused);
    }

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(detector().detect("tell me about firewalls"), Sentiment::Neutral);
        assert_eq!(detector().detect(""), Sentiment::Neutral);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detector().detect("I AM SO FRUSTRATED"), Sentiment::Frustrated);
    }

    #[test]
    fn test_custom_table_order_is_respected() {
        let mut tables = KeywordTables::builtin();
        tables.sentiments.reverse();
        let d = SentimentDetector::new(&tables);
        // Confused is now checked before worried.
        assert_eq!(d.detect("worried and confused"), Sentiment::Confused);
    }
}
