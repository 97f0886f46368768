//! Entity extraction from message text.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Entity, EntityType};

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:tomorrow|today|yesterday|\d{1,2}:\d{2}(?:\s*(?:am|pm))?|in\s+\d+\s+(?:minutes?|hours?|days?|weeks?)|(?:next|this|last)\s+(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|week|month|year))\b",
    )
    .expect("Invalid time regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("Invalid email regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}\b(?:/[^\s]*)?",
    )
    .expect("Invalid URL regex")
});

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("Invalid IPv4 regex")
});

static MAC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9A-Fa-f]{2}(?:[:-][0-9A-Fa-f]{2}){5}\b").expect("Invalid MAC regex")
});

/// Extracts times, email addresses, URLs, IPv4 and MAC addresses.
///
/// Every pattern runs on every message. Results are grouped by type in the
/// order TIME, EMAIL, URL, IP_ADDRESS, MAC_ADDRESS, each group in document
/// order. Overlapping matches from different patterns are all kept: the
/// domain of an email address is also reported as a URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all recognized entities from the raw (not lowercased) text.
    pub fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        let patterns: [(&Regex, EntityType); 5] = [
            (&TIME_RE, EntityType::Time),
            (&EMAIL_RE, EntityType::Email),
            (&URL_RE, EntityType::Url),
            (&IPV4_RE, EntityType::IpAddress),
            (&MAC_RE, EntityType::MacAddress),
        ];

        for (re, entity_type) in patterns {
            for m in re.find_iter(text) {
                entities.push(Entity {
                    entity_type,
                    value: m.as_str().to_string(),
                    start_index: m.start(),
                    length: m.len(),
                });
            }
        }

        entities
    }
}
