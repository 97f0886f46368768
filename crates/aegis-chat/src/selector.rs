//! Reply selection and dialogue memory updates.
//!
//! One selector per session. Evaluation order per message:
//! 1. blank input gets the clarification reply and nothing is recorded
//! 2. the message is appended to history
//! 3. memory questions short-circuit (last question, history, favorite)
//! 4. a sentiment prefix is chosen
//! 5. the first topic in table order with a keyword hit is looked up
//! 6. a topic hit updates interest counts and returns a topic reply
//! 7. otherwise small-talk patterns are tried
//! 8. otherwise a generic suggestion is returned
//!
//! Topic lookup here is single-label (`first_match`), unlike the
//! multi-label topics in `AnalysisResult`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use aegis_nlp::MessageAnalyzer;

use crate::responses::ResponseBank;
use crate::state::{DialogueState, LastTopic};

const LAST_QUESTION_TRIGGERS: [&str; 2] = ["last question", "previous question"];
const HISTORY_TRIGGERS: [&str; 2] = ["conversation history", "what did we talk about"];
const FAVORITE_TRIGGERS: [&str; 3] = ["favorite", "favourite", "most interested"];

/// How many topics a history answer lists.
const HISTORY_TOP_TOPICS: usize = 3;

/// Mixed into the seed of the follow-up stream.
const FOLLOW_UP_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

fn contains_any(lower: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|t| lower.contains(t))
}

fn pick<'a>(rng: &mut StdRng, list: &'a [String]) -> Option<&'a str> {
    if list.is_empty() {
        return None;
    }
    Some(list[rng.random_range(0..list.len())].as_str())
}

/// Composes replies and keeps a session's [`DialogueState`] current.
pub struct ResponseSelector {
    bank: Arc<ResponseBank>,
    analyzer: Arc<MessageAnalyzer>,
    reply_rng: StdRng,
    follow_up_rng: StdRng,
}

impl ResponseSelector {
    /// Selector seeded from OS entropy.
    pub fn new(bank: Arc<ResponseBank>, analyzer: Arc<MessageAnalyzer>) -> Self {
        Self {
            bank,
            analyzer,
            reply_rng: StdRng::from_os_rng(),
            follow_up_rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic selector. Reply and follow-up picks use separate
    /// streams derived from `seed`.
    pub fn with_seed(bank: Arc<ResponseBank>, analyzer: Arc<MessageAnalyzer>, seed: u64) -> Self {
        Self {
            bank,
            analyzer,
            reply_rng: StdRng::seed_from_u64(seed),
            follow_up_rng: StdRng::seed_from_u64(seed ^ FOLLOW_UP_STREAM),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed(
        bank: Arc<ResponseBank>,
        analyzer: Arc<MessageAnalyzer>,
        seed: Option<u64>,
    ) -> Self {
        match seed {
            Some(seed) => Self::with_seed(bank, analyzer, seed),
            None => Self::new(bank, analyzer),
        }
    }

    /// Produce the reply for `message`, updating `state`.
    pub fn respond(&mut self, state: &mut DialogueState, message: &str) -> String {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return self.bank.clarification.clone();
        }

        state.record_user(trimmed);
        let lower = trimmed.to_lowercase();

        if let Some(reply) = self.memory_reply(state, &lower) {
            state.record_bot(&reply);
            return reply;
        }

        let sentiment = self.analyzer.sentiment().detect(&lower);
        let prefix = self.bank.prefix(sentiment).to_string();
        let topics = self.analyzer.topics();

        if let Some(topic) = topics.first_match(&lower) {
            let count = state.record_topic_interest(&topic.key, &topics.topic_order());
            state.set_last_topic(Some(LastTopic::Topic {
                key: topic.key.clone(),
                display_name: topic.display_name.clone(),
            }));
            let reply = self
                .bank
                .replies_for(&topic.key)
                .and_then(|replies| pick(&mut self.reply_rng, replies))
                .unwrap_or(self.bank.apology.as_str());
            let composed = format!("{}{}", prefix, reply);
            debug!(topic = %topic.key, count, sentiment = sentiment.as_str(), "Topic reply");
            state.record_bot(&composed);
            state.set_last_question(lower);
            return composed;
        }

        if let Some(pattern) = self.bank.conversational_match(&lower) {
            let reply = pick(&mut self.reply_rng, &pattern.replies)
                .unwrap_or(self.bank.apology.as_str());
            let composed = format!("{}{}", prefix, reply);
            debug!(pattern = %pattern.name, "Conversational reply");
            state.set_last_topic(pattern.gratitude.then_some(LastTopic::Gratitude));
            state.record_bot(&composed);
            state.set_last_question(lower);
            return composed;
        }

        let reply = pick(&mut self.reply_rng, &self.bank.generic)
            .unwrap_or(self.bank.apology.as_str());
        let composed = format!("{}{}", prefix, reply);
        state.set_last_topic(None);
        state.record_bot(&composed);
        state.set_last_question(lower);
        composed
    }

    /// A deeper tip for `topic_key`, drawn from the follow-up stream.
    pub fn follow_up(&mut self, topic_key: &str) -> Option<String> {
        self.bank
            .follow_ups_for(topic_key)
            .and_then(|tips| pick(&mut self.follow_up_rng, tips))
            .map(str::to_string)
    }

    fn memory_reply(&self, state: &DialogueState, lower: &str) -> Option<String> {
        let topics = self.analyzer.topics();

        if contains_any(lower, &LAST_QUESTION_TRIGGERS) {
            return Some(match state.last_question() {
                Some(q) => format!(
                    "Your last question was: '{}'. Feel free to ask a follow-up!",
                    q
                ),
                None => {
                    "This seems to be your first question! Ask me anything about staying safe online."
                        .to_string()
                }
            });
        }

        if contains_any(lower, &HISTORY_TRIGGERS) {
            // History already includes the current message.
            if state.history().len() <= 2 {
                return Some(
                    "We've only just started our conversation! Ask me about any security topic."
                        .to_string(),
                );
            }
            let top = state.top_topics(HISTORY_TOP_TOPICS, &topics.topic_order());
            if top.is_empty() {
                return Some(
                    "We've been chatting, but we haven't focused on a specific security topic yet."
                        .to_string(),
                );
            }
            let names: Vec<&str> = top.iter().map(|(k, _)| topics.display_name(k)).collect();
            return Some(format!(
                "So far we've mostly talked about: {}.",
                names.join(", ")
            ));
        }

        if contains_any(lower, &FAVORITE_TRIGGERS) {
            return Some(match state.favorite_topic() {
                Some(key) => format!(
                    "Your favorite topic seems to be {}! You've asked about it {} times.",
                    topics.display_name(key),
                    state.topic_count(key)
                ),
                None => {
                    "I don't have enough data yet to know your favorite topic. Keep asking questions!"
                        .to_string()
                }
            });
        }

        None
    }
}
