//! Per-session dialogue memory.

use serde::{Deserialize, Serialize};

/// What the previous reply was about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastTopic {
    Topic { key: String, display_name: String },
    /// The user said thanks. Never earns a follow-up offer.
    Gratitude,
}

/// Conversation memory for one session.
///
/// Only the response selector mutates this; everything else reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    user_name: Option<String>,
    last_question: Option<String>,
    last_topic: Option<LastTopic>,
    conversation_history: Vec<String>,
    /// Topic key to count, in first-seen order. Keys are unique.
    topic_interest_counts: Vec<(String, u32)>,
    favorite_topic: Option<String>,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.user_name = Some(name.into());
    }

    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    pub fn last_topic(&self) -> Option<&LastTopic> {
        self.last_topic.as_ref()
    }

    pub fn history(&self) -> &[String] {
        &self.conversation_history
    }

    pub fn topic_interest_counts(&self) -> &[(String, u32)] {
        &self.topic_interest_counts
    }

    pub fn topic_count(&self, key: &str) -> u32 {
        self.topic_interest_counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Number of topic replies so far.
    pub fn total_topic_interest(&self) -> u32 {
        self.topic_interest_counts.iter().map(|(_, n)| n).sum()
    }

    /// Key of the most-discussed topic.
    pub fn favorite_topic(&self) -> Option<&str> {
        self.favorite_topic.as_deref()
    }

    /// The topic to offer a follow-up tip for, if any. Gratitude never
    /// qualifies.
    pub fn follow_up_topic(&self) -> Option<(&str, &str)> {
        match &self.last_topic {
            Some(LastTopic::Topic { key, display_name }) => {
                Some((key.as_str(), display_name.as_str()))
            }
            Some(LastTopic::Gratitude) | None => None,
        }
    }

    pub(crate) fn record_user(&mut self, message: &str) {
        self.conversation_history.push(format!("User: {}", message));
    }

    pub(crate) fn record_bot(&mut self, reply: &str) {
        self.conversation_history.push(format!("Bot: {}", reply));
    }

    pub(crate) fn set_last_question(&mut self, question: impl Into<String>) {
        self.last_question = Some(question.into());
    }

    pub(crate) fn set_last_topic(&mut self, topic: Option<LastTopic>) {
        self.last_topic = topic;
    }

    /// Count one more mention of `key` and recompute the favorite.
    ///
    /// `topic_order` is the topic table order, used to break ties. Returns
    /// the new count.
    pub(crate) fn record_topic_interest(&mut self, key: &str, topic_order: &[&str]) -> u32 {
        let count = match self.topic_interest_counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                self.topic_interest_counts.push((key.to_string(), 1));
                1
            }
        };
        let favorite = self
            .top_topics(1, topic_order)
            .first()
            .map(|(k, _)| k.to_string());
        self.favorite_topic = favorite;
        count
    }

    /// Up to `n` topics by descending count. Ties go to the topic earlier in
    /// `topic_order`; keys missing from it rank after every listed key.
    pub fn top_topics(&self, n: usize, topic_order: &[&str]) -> Vec<(&str, u32)> {
        let rank = |key: &str| {
            topic_order
                .iter()
                .position(|k| *k == key)
                .unwrap_or(usize::MAX)
        };
        let mut ranked: Vec<(&str, u32)> = self
            .topic_interest_counts
            .iter()
            .map(|(k, c)| (k.as_str(), *c))
            .collect();
        // Stable sort keeps first-seen order among unlisted keys.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| rank(a.0).cmp(&rank(b.0))));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [&str; 4] = ["password", "phishing", "vpn", "wifi"];

    #[test]
    fn test_new_state_is_empty() {
        let state = DialogueState::new();
        assert!(state.last_question().is_none());
        assert!(state.last_topic().is_none());
        assert!(state.history().is_empty());
        assert!(state.favorite_topic().is_none());
        assert!(state.user_name().is_none());
    }

    #[test]
    fn test_history_tags() {
        let mut state = DialogueState::new();
        state.record_user("hi");
        state.record_bot("hello");
        assert_eq!(state.history(), &["User: hi".to_string(), "Bot: hello".to_string()]);
    }

    #[test]
    fn test_favorite_converges_on_highest_count() {
        let mut state = DialogueState::new();
        for _ in 0..3 {
            state.record_topic_interest("password", &ORDER);
        }
        state.record_topic_interest("vpn", &ORDER);
        assert_eq!(state.favorite_topic(), Some("password"));
        assert_eq!(state.topic_count("password"), 3);
        assert_eq!(state.topic_count("vpn"), 1);
        assert_eq!(state.topic_count("wifi"), 0);
    }

    #[test]
    fn test_tie_broken_by_table_order_not_recency() {
        let mut state = DialogueState::new();
        state.record_topic_interest("vpn", &ORDER);
        state.record_topic_interest("phishing", &ORDER);
        assert_eq!(state.favorite_topic(), Some("phishing"));

        state.record_topic_interest("vpn", &ORDER);
        assert_eq!(state.favorite_topic(), Some("vpn"));
    }

    #[test]
    fn test_top_topics_limited_and_ordered() {
        let mut state = DialogueState::new();
        for key in ["wifi", "wifi", "vpn", "password", "phishing", "phishing"] {
            state.record_topic_interest(key, &ORDER);
        }
        let top: Vec<&str> = state
            .top_topics(3, &ORDER)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(top, vec!["phishing", "wifi", "password"]);
    }

    #[test]
    fn test_unlisted_keys_rank_last() {
        let mut state = DialogueState::new();
        state.record_topic_interest("custom", &ORDER);
        state.record_topic_interest("wifi", &ORDER);
        assert_eq!(state.favorite_topic(), Some("wifi"));
    }

    #[test]
    fn test_follow_up_topic_excludes_gratitude() {
        let mut state = DialogueState::new();
        state.set_last_topic(Some(LastTopic::Topic {
            key: "vpn".to_string(),
            display_name: "VPNs".to_string(),
        }));
        assert_eq!(state.follow_up_topic(), Some(("vpn", "VPNs")));

        state.set_last_topic(Some(LastTopic::Gratitude));
        assert!(state.follow_up_topic().is_none());

        state.set_last_topic(None);
        assert!(state.follow_up_topic().is_none());
    }

    #[test]
    fn test_last_topic_serializes_tagged() {
        let json = serde_json::to_string(&LastTopic::Gratitude).unwrap();
        assert_eq!(json, r#"{"kind":"gratitude"}"#);
    }
}
